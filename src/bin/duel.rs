use colored::Colorize;
use dialoguer::Select;
use dialoguer::theme::ColorfulTheme;
use roshambot::combat::Move;
use roshambot::combat::Observation;
use roshambot::combat::Outcome;
use roshambot::engine::Config;
use roshambot::engine::Engine;
use roshambot::engine::TurnInput;
use roshambot::profile::Snapshot;
use roshambot::save::Stash;

const OPPONENT: &str = "human";

/// interactive session: the engine models you live. your profile is
/// stashed between sessions, so it remembers your habits.
fn main() {
    roshambot::log();
    let mut engine = Engine::from(Config::default());
    if let Ok(snapshot) = Snapshot::load(OPPONENT) {
        if engine.import(snapshot) {
            log::info!("{:<32}{:<32}", "profile restored", OPPONENT);
        }
    }
    let mut turn = engine.profile(OPPONENT).map(|p| p.turn).unwrap_or(0);
    let mut wins = 0usize;
    let mut losses = 0usize;
    let mut draws = 0usize;
    println!("{}", "rock, paper, scissor. the bot is watching.".bold());
    loop {
        let Some(yours) = prompt() else {
            break;
        };
        let decision = engine.decide(OPPONENT, &TurnInput::default());
        // the engine committed before your move was revealed
        let outcome = Outcome::of(decision.choice, yours);
        let line = format!(
            "bot throws {}  you throw {}  ({:.0}% sure via {})",
            decision.choice, yours, decision.confidence * 100., decision.source
        );
        match outcome {
            Outcome::Win => {
                wins += 1;
                println!("{}", line.red());
            }
            Outcome::Loss => {
                losses += 1;
                println!("{}", line.green());
            }
            Outcome::Draw => {
                draws += 1;
                println!("{}", line.yellow());
            }
        }
        println!(
            "bot {} | you {} | drawn {}   it had you at {}",
            wins, losses, draws, decision.forecast
        );
        engine.record(Observation::new(OPPONENT, turn, decision.choice, yours));
        turn += 1;
    }
    engine.close_episode(OPPONENT);
    if let Some(snapshot) = engine.export(OPPONENT) {
        snapshot.keep();
    }
    println!("final: bot {} you {} drawn {}", wins, losses, draws);
}

fn prompt() -> Option<Move> {
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("your throw")
        .items(&["rock", "paper", "scissor", "quit"])
        .default(0)
        .interact()
        .ok()?;
    match selection {
        0 => Some(Move::Rock),
        1 => Some(Move::Paper),
        2 => Some(Move::Scissor),
        _ => None,
    }
}
