use clap::Parser;
use colored::Colorize;
use rayon::prelude::*;
use roshambot::Probability;
use roshambot::combat::Move;
use roshambot::combat::Observation;
use roshambot::combat::Outcome;
use roshambot::engine::Config;
use roshambot::engine::Engine;
use roshambot::engine::TurnInput;
use roshambot::save::Stash;

/// pit the engine against a bench of scripted opponents, one worker per
/// opponent, and report how hard each one gets exploited.
#[derive(Parser)]
#[command(name = "arena", about = "scripted opponent gauntlet")]
struct Args {
    /// turns per opponent
    #[arg(long, default_value_t = 300)]
    turns: usize,
    /// exploration rate for every engine
    #[arg(long, default_value_t = roshambot::EXPLORATION_RATE)]
    exploration: Probability,
    /// turns per episode before the chain analyzer sees a summary
    #[arg(long, default_value_t = 50)]
    episode: usize,
    /// persist learned profiles under ./profiles
    #[arg(long)]
    stash: bool,
}

/// the opponent bench. each script embodies one behavioral signature
/// the predictor set claims to exploit.
enum Script {
    /// always the same move
    Stone,
    /// rotates every turn
    Cycler,
    /// counters our previous move
    Mirror,
    /// copies our previous move
    Copier,
    /// stays after a win, shifts after a loss
    Staying,
    /// heavily lopsided random
    Lopsided,
    /// counters our expected counter
    Simulant,
}

impl Script {
    fn bench() -> Vec<(&'static str, Self)> {
        vec![
            ("stone", Self::Stone),
            ("cycler", Self::Cycler),
            ("mirror", Self::Mirror),
            ("copier", Self::Copier),
            ("staying", Self::Staying),
            ("lopsided", Self::Lopsided),
            ("simulant", Self::Simulant),
        ]
    }
    fn throw(
        &self,
        turn: usize,
        ours_prev: Option<Move>,
        mine_prev: Option<(Move, Outcome)>,
        rng: &mut rand::rngs::SmallRng,
    ) -> Move {
        use rand::Rng;
        use rand::prelude::IndexedRandom;
        let fallback = |rng: &mut rand::rngs::SmallRng| {
            Move::ALL.choose(rng).copied().expect("ALL is nonempty")
        };
        match self {
            Self::Stone => Move::Rock,
            Self::Cycler => Move::from(turn),
            Self::Mirror => ours_prev.map(|m| m.counter()).unwrap_or_else(|| fallback(rng)),
            Self::Copier => ours_prev.unwrap_or_else(|| fallback(rng)),
            Self::Staying => match mine_prev {
                Some((m, Outcome::Win)) => m,
                Some((m, _)) => m.counter(),
                None => fallback(rng),
            },
            Self::Lopsided => match rng.random::<f32>() {
                x if x < 0.6 => Move::Rock,
                x if x < 0.85 => Move::Paper,
                _ => Move::Scissor,
            },
            Self::Simulant => ours_prev
                .map(|m| m.counter().counter())
                .unwrap_or_else(|| fallback(rng)),
        }
    }
}

struct Report {
    name: &'static str,
    wins: usize,
    draws: usize,
    losses: usize,
    confidence: Probability,
}

impl Report {
    fn exploit(&self) -> Probability {
        let decided = self.wins + self.losses;
        match decided {
            0 => 0.5,
            n => self.wins as Probability / n as Probability,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rate = format!("{:>5.1}%", self.exploit() * 100.);
        let rate = match self.exploit() {
            x if x > 0.55 => rate.green(),
            x if x < 0.45 => rate.red(),
            _ => rate.yellow(),
        };
        write!(
            f,
            "{:<12}{}  {:>4}W {:>4}D {:>4}L  conf {:.2}",
            self.name, rate, self.wins, self.draws, self.losses, self.confidence
        )
    }
}

/// one full engagement: a fresh engine versus one script, sequential by
/// construction; concurrency lives across opponents, never within one
fn battle(name: &'static str, script: Script, args: &Args) -> Report {
    use rand::SeedableRng;
    let mut engine = Engine::from(Config {
        exploration_rate: args.exploration,
        ..Config::default()
    });
    let ref mut rng = rand::rngs::SmallRng::seed_from_u64(name.len() as u64);
    let mut report = Report {
        name,
        wins: 0,
        draws: 0,
        losses: 0,
        confidence: 0.,
    };
    let mut ours_prev = None;
    let mut mine_prev = None;
    for t in 0..args.turns {
        let decision = engine.decide(name, &TurnInput::default());
        let theirs = script.throw(t, ours_prev, mine_prev, rng);
        let obs = Observation::new(name, t, decision.choice, theirs);
        match obs.outcome {
            Outcome::Win => report.wins += 1,
            Outcome::Draw => report.draws += 1,
            Outcome::Loss => report.losses += 1,
        }
        ours_prev = Some(decision.choice);
        mine_prev = Some((theirs, obs.outcome.flip()));
        report.confidence = decision.confidence;
        engine.record(obs);
        if (t + 1) % args.episode == 0 {
            engine.close_episode(name);
        }
    }
    if args.stash {
        if let Some(snapshot) = engine.export(name) {
            snapshot.keep();
        }
    }
    report
}

fn main() {
    roshambot::log();
    let args = Args::parse();
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get().min(Script::bench().len()))
        .build_global()
        .expect("build worker pool");
    log::info!("{:<32}{:<32}", "starting gauntlet", args.turns);
    let mut reports = Script::bench()
        .into_par_iter()
        .map(|(name, script)| battle(name, script, &args))
        .collect::<Vec<_>>();
    reports.sort_by(|a, b| {
        b.exploit()
            .partial_cmp(&a.exploit())
            .expect("rates are finite")
    });
    println!();
    for report in reports.iter() {
        println!("{}", report);
    }
    let overall = reports.iter().map(Report::exploit).sum::<f32>() / reports.len() as f32;
    log::info!("{:<32}{:<32.3}", "mean exploitation", overall);
}
