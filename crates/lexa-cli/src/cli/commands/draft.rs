//! Draft command handler.

use std::io::Write;

use anyhow::Result;
use lexa_core::context::AppContext;

pub async fn run(
    ctx: &mut AppContext,
    kind: &str,
    instructions: Option<&str>,
    no_stream: bool,
) -> Result<()> {
    if no_stream {
        let document = ctx.draft_once(kind, instructions).await?;
        println!("{document}");
    } else {
        ctx.draft_document(kind, instructions, |chunk| {
            print!("{chunk}");
            let _ = std::io::stdout().flush();
        })
        .await?;
        println!();
    }
    Ok(())
}
