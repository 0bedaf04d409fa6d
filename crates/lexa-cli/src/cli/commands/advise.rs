//! Advise command handler.

use std::io::Write;

use anyhow::Result;
use lexa_core::api::Clarification;
use lexa_core::context::AppContext;

pub async fn run(ctx: &mut AppContext, prompt: &str, no_stream: bool) -> Result<()> {
    let assistant_id = if no_stream {
        ctx.ask(prompt).await?
    } else {
        let id = ctx
            .send_message(prompt, |chunk| {
                print!("{chunk}");
                let _ = std::io::stdout().flush();
            })
            .await?;
        println!();
        id
    };

    let message = ctx
        .conversation
        .messages
        .iter()
        .find(|m| m.id == assistant_id);

    if let Some(message) = message {
        if no_stream {
            println!("{}", message.content);
        }
        if let Some(clarification) = &message.clarification {
            print_clarification(clarification);
        }
    }
    Ok(())
}

fn print_clarification(clarification: &Clarification) {
    println!();
    println!("? {}", clarification.question);
    for choice in &clarification.choices {
        println!("  - {choice}");
    }
}
