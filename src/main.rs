use anyhow::{bail, Context, Result};
use mock_interview::audio::{AudioClip, AudioRecorder};
use mock_interview::session::{HistoryStats, Response, SessionSummary};
use mock_interview::storage::{history_key, Account, MemoryAccountStore};
use mock_interview::transcription::{BlockingTranscriber, HttpTranscriber};
use mock_interview::{
    Advance, Category, HistoryStore, InterviewError, PracticeConfig, ScoreBundle,
    SessionController, SessionEvent,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: mock-interview [technical|behavioral|hr] [--config PATH] [--user NAME] [--stats]";
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const CAPTURE_CHUNK: usize = 1600;

struct Args {
    category: Category,
    config: Option<PathBuf>,
    user: String,
    stats_only: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        category: Category::Technical,
        config: None,
        user: std::env::var("USER").unwrap_or_else(|_| "candidate".to_string()),
        stats_only: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = Some(iter.next().context(USAGE)?.into()),
            "--user" => args.user = iter.next().context(USAGE)?,
            "--stats" => args.stats_only = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other if other.starts_with('-') => bail!("unknown option '{}'\n{}", other, USAGE),
            other => args.category = other.parse()?,
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mock_interview=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => PracticeConfig::load(path)?,
        None => PracticeConfig::default(),
    };

    let account = Account::local(&args.user);
    info!("Signed in as {} ({})", account.name, account.id);

    if args.stats_only {
        return print_stats(&config, &account);
    }

    let accounts = Arc::new(MemoryAccountStore::with_account(account));
    let mut controller = config.session_controller(accounts);
    let voice = match config.transcriber()? {
        Some(transcriber) => {
            info!("Voice answers go to {}", transcriber.endpoint());
            Some(BlockingTranscriber::new(transcriber)?)
        }
        None => None,
    };
    let mut recorder = config.recorder();

    run_session(&mut controller, args.category, voice.as_ref(), &mut recorder)
}

type VoiceTranscriber = BlockingTranscriber<HttpTranscriber>;

fn run_session(
    controller: &mut SessionController,
    category: Category,
    voice: Option<&VoiceTranscriber>,
    recorder: &mut AudioRecorder,
) -> Result<()> {
    let events = controller.event_receiver();
    let count = controller.start(category)?;
    println!("{} ({} questions)", category.title(), count);
    if voice.is_some() {
        println!("Type an answer, or '@path/to/answer.wav' to answer by voice.");
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let index = controller.state().question_index().unwrap_or(0);
        if let Some(question) = controller.current_question() {
            println!("\nQuestion {}/{}: {}", index + 1, count, question.text);
        }

        let Some(line) = prompt(&mut lines, "> ")? else {
            println!("\nInterview abandoned; nothing was saved.");
            return Ok(());
        };

        let response = match answer_from_line(&line, voice, recorder) {
            Ok(response) => response,
            Err(e) => {
                println!("{}", e.user_message());
                continue;
            }
        };

        if let Err(e) = controller.submit(response) {
            println!("{}", e.user_message());
            continue;
        }

        let score = match wait_with_progress(controller, &events) {
            Ok(score) => score,
            Err(e) if e.ends_session() => {
                println!("{}", e.user_message());
                return Err(e.into());
            }
            Err(e) => {
                println!("{}", e.user_message());
                continue;
            }
        };
        print_feedback(&score);

        match advance(controller, &mut lines)? {
            Some(record) => {
                let summary = SessionSummary::from_record(&record);
                print_summary(&summary);
                return Ok(());
            }
            None => continue,
        }
    }
}

/// Typed text, or a WAV file fed through the recorder and transcribed
fn answer_from_line(
    line: &str,
    voice: Option<&VoiceTranscriber>,
    recorder: &mut AudioRecorder,
) -> mock_interview::Result<Response> {
    let Some(path) = line.trim().strip_prefix('@') else {
        return Ok(Response::typed(line));
    };
    let Some(voice) = voice else {
        return Err(InterviewError::TranscriptionFailed(
            "transcription is disabled".to_string(),
        ));
    };

    let source = AudioClip::open_wav(path)?;
    let capture = recorder.capture_handle();
    recorder.start()?;
    for chunk in source.samples.chunks(CAPTURE_CHUNK) {
        capture.push(chunk.to_vec());
    }
    let clip = recorder.stop()?;

    let response = voice.transcribe_answer(&clip)?;
    println!("Heard: {}", response.text);
    Ok(response)
}

fn wait_with_progress(
    controller: &mut SessionController,
    events: &crossbeam_channel::Receiver<SessionEvent>,
) -> mock_interview::Result<ScoreBundle> {
    loop {
        print_stage_events(events);
        if let Some(score) = controller.poll_feedback()? {
            let score = score.clone();
            print_stage_events(events);
            return Ok(score);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn print_stage_events(events: &crossbeam_channel::Receiver<SessionEvent>) {
    for event in events.try_iter() {
        if let SessionEvent::StageStarted { stage, .. } = event {
            println!("  ... {}", stage.label());
        }
    }
}

/// Move on; returns the saved record once the last question is done
fn advance(
    controller: &mut SessionController,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<mock_interview::SessionRecord>> {
    loop {
        match controller.request_next() {
            Ok(Advance::Question(_)) => return Ok(None),
            Ok(Advance::Finished(record)) => return Ok(Some(record)),
            Err(e @ InterviewError::PersistenceFailed(_)) => {
                warn!("{}", e);
                println!("{}", e.user_message());
                match prompt(lines, "Retry saving? [Y/n] ")? {
                    Some(reply) if reply.trim().eq_ignore_ascii_case("n") => {
                        bail!("session was not saved: {}", e)
                    }
                    Some(_) => continue,
                    None => bail!("session was not saved: {}", e),
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;
    lines.next().transpose().context("failed to read input")
}

fn print_feedback(score: &ScoreBundle) {
    println!(
        "\nOverall {}  (relevance {}, structure {}, clarity {})",
        score.overall, score.relevance, score.structure, score.clarity
    );
    println!("{}", score.feedback);
}

fn print_summary(summary: &SessionSummary) {
    println!("\n{} complete", summary.title);
    println!(
        "{} questions, about {} minutes",
        summary.questions_answered, summary.estimated_minutes
    );
    println!(
        "Overall {}  (relevance {}, structure {}, clarity {})",
        summary.overall, summary.relevance, summary.structure, summary.clarity
    );
    println!("Strengths:");
    for item in &summary.strengths {
        println!("  + {}", item);
    }
    println!("To improve:");
    for item in &summary.improvements {
        println!("  - {}", item);
    }
}

fn print_stats(config: &PracticeConfig, account: &Account) -> Result<()> {
    let records = config.history_store().get(&history_key(&account.id))?;
    let stats = HistoryStats::from_records(&records);

    if !stats.has_history() {
        println!("No completed interviews yet for {}.", account.name);
        return Ok(());
    }

    println!("Interviews completed: {}", stats.total_sessions);
    println!("Questions answered:   {}", stats.total_questions);
    if let Some(average) = stats.average_overall {
        println!("Average score:        {}", average);
    }
    if let Some(best) = stats.best_overall {
        println!("Best score:           {}", best);
    }
    for (category, count) in &stats.sessions_by_category {
        println!("  {:<22}{}", category.title(), count);
    }
    if let Some(last) = stats.last_completed {
        println!("Last practice:        {}", last.format("%Y-%m-%d %H:%M UTC"));
    }
    Ok(())
}
