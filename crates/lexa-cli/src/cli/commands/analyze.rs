//! Analyze command handler.
//!
//! Walks the intake wizard with the answers provided on the command line,
//! one step per answer group, then runs the analysis.

use std::io::Write;

use anyhow::Result;
use lexa_core::context::AppContext;
use lexa_core::session::QuestionnairePatch;

#[derive(clap::Args, Debug, Clone, Default)]
pub struct AnswerArgs {
    /// Country for the analysis (defaults to the configured country)
    #[arg(long)]
    pub country: Option<String>,

    /// Kind of activity (e.g. "conseil", "e-commerce")
    #[arg(long)]
    pub activity: Option<String>,

    /// Description of the planned activity
    #[arg(long)]
    pub description: Option<String>,

    /// Number of founders
    #[arg(long)]
    pub founders: Option<u32>,

    /// Planned share capital in euros
    #[arg(long)]
    pub capital: Option<u64>,

    /// The founders plan to raise funds
    #[arg(long)]
    pub seeks_funding: bool,

    /// An exit (sale of the company) is planned
    #[arg(long)]
    pub plans_exit: bool,

    /// Personal-asset protection matters to the founders
    #[arg(long)]
    pub asset_protection: bool,

    /// Expected employee count
    #[arg(long)]
    pub employees: Option<u32>,
}

pub async fn run(ctx: &mut AppContext, answers: AnswerArgs, no_stream: bool) -> Result<()> {
    fill_intake(ctx, answers);

    if no_stream {
        let summary = ctx.analyze_once().await?;
        println!("{summary}");
    } else {
        ctx.run_analysis(|chunk| {
            print!("{chunk}");
            let _ = std::io::stdout().flush();
        })
        .await?;
        println!();
    }
    Ok(())
}

/// Applies the answers to the intake store, advancing the wizard cursor
/// step by step the way the guided flow does.
fn fill_intake(ctx: &mut AppContext, answers: AnswerArgs) {
    let country = answers
        .country
        .unwrap_or_else(|| ctx.config.country.clone());
    ctx.intake.set_country(country);

    // Step 1: activity
    ctx.intake.update_questionnaire(QuestionnairePatch {
        activity_type: answers.activity,
        activity_description: answers.description,
        ..QuestionnairePatch::default()
    });
    ctx.intake.next_step();

    // Step 2: founders and capital
    ctx.intake.update_questionnaire(QuestionnairePatch {
        founders_count: answers.founders,
        planned_capital: answers.capital,
        ..QuestionnairePatch::default()
    });
    ctx.intake.next_step();

    // Step 3: project flags
    ctx.intake.update_questionnaire(QuestionnairePatch {
        seeks_funding: Some(answers.seeks_funding),
        plans_exit: Some(answers.plans_exit),
        wants_asset_protection: Some(answers.asset_protection),
        ..QuestionnairePatch::default()
    });
    ctx.intake.next_step();

    // Step 4: employees
    ctx.intake.update_questionnaire(QuestionnairePatch {
        employee_count: answers.employees,
        ..QuestionnairePatch::default()
    });
    ctx.intake.next_step();
    // Step 5: review + analysis
}
