mod render;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    load_settings, session::CORRECT_ANSWER_REWARD, AnswerOutcome, GeminiGateway,
    GenerationOutcome, RewardNotifier, SessionController,
};
use shared::domain::ScreenPoint;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::runtime::Handle;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "focusflow",
    about = "Turn dense text or a screenshot into a quick learning module"
)]
struct Args {
    /// Text to transform.
    #[arg(long)]
    text: Option<String>,
    /// Image to analyze alongside (or instead of) the text.
    #[arg(long)]
    image: Option<PathBuf>,
    /// Settings file; defaults to ./focusflow.toml or the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the generated module as JSON and exit.
    #[arg(long)]
    json: bool,
}

type InputLines = Lines<BufReader<Stdin>>;

async fn prompt_line(lines: &mut InputLines, prompt: &str) -> Result<Option<String>> {
    println!("{prompt}");
    Ok(lines.next_line().await?)
}

async fn attach_image(controller: &mut SessionController, path: &Path) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read image '{}'", path.display()))?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    controller.attach_image(bytes, &mime_type)?;
    Ok(())
}

async fn run_quiz(controller: &mut SessionController, lines: &mut InputLines) -> Result<()> {
    let questions = controller
        .session()
        .module()
        .map(|module| module.quiz.clone())
        .unwrap_or_default();

    for (index, question) in questions.iter().enumerate() {
        print!("{}", render::render_question(controller.session(), index + 1, question));
        let choice = loop {
            let Some(line) = prompt_line(lines, "Your answer:").await? else {
                return Ok(());
            };
            match render::parse_choice(question, &line) {
                Some(choice) => break choice,
                None => println!("Pick one of the listed options."),
            }
        };

        let outcome = controller.answer_question(&question.id, choice, ScreenPoint::default());
        match outcome {
            AnswerOutcome::Correct => println!("Nailed it! +{CORRECT_ANSWER_REWARD} XP"),
            AnswerOutcome::Incorrect => println!("Not quite."),
            AnswerOutcome::Ignored => continue,
        }
        print!("{}", render::render_question(controller.session(), index + 1, question));
        println!("{}\n", question.explanation);
    }
    Ok(())
}

async fn run_remixes(
    controller: &mut SessionController,
    gateway: &GeminiGateway,
    lines: &mut InputLines,
) -> Result<()> {
    loop {
        let Some(module) = controller.session().module() else {
            return Ok(());
        };
        let count = module.breakdown.len();
        let Some(line) = prompt_line(
            lines,
            &format!("Remix a key point for a 5-year-old (1-{count}), or press Enter to finish:"),
        )
        .await?
        else {
            return Ok(());
        };
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let Some(index) = line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|i| *i < count)
        else {
            println!("Enter a number between 1 and {count}.");
            continue;
        };
        if !controller.session().can_remix(index) {
            println!("That point is already remixed.");
            continue;
        }

        let item = module.breakdown[index].clone();
        let outcome = controller
            .remix_breakdown_item(gateway, index, &item.remix_source(), ScreenPoint::default())
            .await;
        debug!(index, ?outcome, "remix finished");
        if let Some(line) = render::remix_outcome_line(controller.session(), outcome, index, &item)
        {
            println!("{line}");
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_settings(args.config.as_deref())?;
    let gateway = GeminiGateway::from_settings(&settings)?;
    let mut controller = SessionController::new(RewardNotifier::new(Handle::current()));

    if let Some(text) = args.text {
        controller.set_input_text(text);
    }
    if let Some(path) = &args.image {
        attach_image(&mut controller, path).await?;
    }

    match controller.generate_module(&gateway).await {
        GenerationOutcome::Ready => {}
        GenerationOutcome::Skipped => {
            bail!("nothing to transform: supply --text, --image, or both")
        }
        GenerationOutcome::Failed | GenerationOutcome::Discarded => {
            let notice = controller
                .session()
                .failure_notice()
                .unwrap_or("module generation failed");
            bail!("{notice}")
        }
    }

    let module = controller
        .session()
        .module()
        .context("module missing after successful generation")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(module)?);
        return Ok(());
    }
    println!("{}", render::render_module(module, controller.session()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    run_quiz(&mut controller, &mut lines).await?;
    run_remixes(&mut controller, &gateway, &mut lines).await?;

    println!("Current Score: {} XP", controller.session().score());
    Ok(())
}
