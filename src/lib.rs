//! Core type aliases, traits, and tuning constants for roshambot.
//!
//! The crate predicts an adversary's next move in repeated
//! rock-paper-scissor combat and selects a risk-aware counter each turn.
//! Everything flows one direction per turn: an `Observation` feeds every
//! predictor, the engine blends their forecasts, adjusts for threat, and
//! commits a move.

pub mod combat;
pub mod engine;
pub mod meta;
pub mod predict;
pub mod profile;
pub mod save;
pub mod simplex;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Forecast weights, mixture coefficients, and move distributions.
pub type Probability = f32;
/// Expected values, payoffs, and attack damage.
pub type Utility = f32;
/// How much a forecast should sway the final decision, in [0, 1].
pub type Confidence = f32;
/// Information-theoretic measures over the move simplex.
pub type Entropy = f32;
/// Zero-based turn counter within an engagement.
pub type Turn = usize;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and simulation.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// ADAPTIVE-ORDER MARKOV
// Order k requires MARKOV_BASE_SUPPORT * 3^(k-1) transitions before its
// table is consulted at all.
// ============================================================================
/// Deepest opponent-move context tracked.
pub const MARKOV_MAX_ORDER: usize = 4;
/// Support multiplier per order (order k needs 20 * 3^(k-1) samples).
pub const MARKOV_BASE_SUPPORT: usize = 20;
/// One-sided z threshold for a modal transition to beat uniformity (p < .01).
pub const Z_CRITICAL: f32 = 2.576;

// ============================================================================
// BAYESIAN ARCHETYPES
// ============================================================================
/// Posterior floor keeping every archetype resurrectable.
pub const BAYES_FLOOR: Probability = 0.01;
/// Mass a reactive archetype (counter/copier) puts on its implied move.
pub const BAYES_FOCUS: Probability = 0.8;

// ============================================================================
// JOINT CONTEXT TREE
// ============================================================================
/// Longest joint (ours, theirs) context.
pub const TREE_DEPTH: usize = 3;
/// Krichevsky-Trofimov additive smoothing per node.
pub const KT_ALPHA: f32 = 0.5;
/// Multiplicative count decay toward recent behavior.
pub const TREE_DECAY: f32 = 0.98;
/// Updates between decay sweeps.
pub const TREE_DECAY_INTERVAL: usize = 16;

// ============================================================================
// RECURRENT PREDICTOR
// ============================================================================
/// Hidden layer width.
pub const RNN_HIDDEN: usize = 12;
/// Local gradient step size.
pub const RNN_RATE: f32 = 0.05;
/// Weight initialization seed (deterministic across restarts).
pub const RNN_SEED: u64 = 0x0B5E55ED;

// ============================================================================
// HYPOTHESIS BATTERY
// ============================================================================
/// Chi-square critical value at df = 2, p < .05.
pub const CHI2_CRITICAL: f32 = 5.991;
/// Minimum sample count before any test fires.
pub const HYPOTHESIS_SUPPORT: usize = 15;
/// Per-observation recency decay on the weighted sample set.
pub const HYPOTHESIS_DECAY: f32 = 0.97;
/// Confidence multiplier on a correct hypothesis prediction.
pub const HYPOTHESIS_BOOST: f32 = 1.08;
/// Confidence multiplier on an incorrect hypothesis prediction.
pub const HYPOTHESIS_FADE: f32 = 0.92;
/// Hypotheses below this confidence are discarded.
pub const HYPOTHESIS_FLOOR: Confidence = 0.5;

// ============================================================================
// EPISODE CHAINS
// ============================================================================
/// Minimum episode-to-episode transitions before chain tests run.
pub const CHAIN_SUPPORT: usize = 3;
/// Minimum transition rate for a chain pattern to count as detected.
pub const CHAIN_RATE: f32 = 0.6;
/// Turns over which a chain forecast fades into within-episode evidence.
pub const CHAIN_FADE_TURNS: Turn = 5;

// ============================================================================
// ADAPTATION LOOPS
// ============================================================================
/// Trailing turns inspected for mutual-adaptation signatures.
pub const LOOP_WINDOW: usize = 30;
/// Marginal distance from uniform below which both sides read as Nash.
pub const LOOP_NASH_SLACK: Probability = 0.08;
/// Override confidence by loop kind: Nash is stable, level-k is chaotic.
pub const LOOP_NASH_CONFIDENCE: Confidence = 0.9;
pub const LOOP_CYCLE_CONFIDENCE: Confidence = 0.6;
pub const LOOP_LEVELK_CONFIDENCE: Confidence = 0.4;

// ============================================================================
// ENSEMBLE BLEND
// Architectural prior weight per forecast source. Only ratios matter.
// ============================================================================
pub const PRIOR_MARKOV: f32 = 1.0;
pub const PRIOR_BAYES: f32 = 1.0;
pub const PRIOR_TREE: f32 = 0.9;
pub const PRIOR_RECURRENT: f32 = 0.6;
pub const PRIOR_WSLS: f32 = 0.7;
pub const PRIOR_HYPOTHESIS: f32 = 1.2;
pub const PRIOR_CHAIN: f32 = 0.8;

// ============================================================================
// DECISION POLICY DEFAULTS (see engine::Config)
// ============================================================================
/// Chance of a uniformly random available move.
pub const EXPLORATION_RATE: Probability = 0.05;
/// Observations before a predictor earns full sample weight.
pub const MIN_BATTLES_FOR_CONFIDENCE: usize = 10;
/// Turns before the ensemble earns full early-game weight.
pub const EARLY_RAMP: Turn = 10;
/// Rolling win rate below which the defensive fallback takes over.
pub const DEFENSIVE_THRESHOLD: f32 = 0.35;
/// Rolling outcome window length.
pub const RECENT_WINDOW: usize = 20;

// ============================================================================
// RISK WEIGHTS
// ============================================================================
/// Loss payoff while any opponent move is lethal this turn.
pub const LETHAL_LOSS: Utility = -5.0;
/// Draw payoff while survival dominates (pulled toward the win payoff).
pub const LETHAL_DRAW: Utility = 0.8;
/// Baseline loss payoff outside lethal turns.
pub const SOFT_LOSS: Utility = -1.2;

// ============================================================================
// PROFILES
// ============================================================================
/// Bounded observation history per opponent.
pub const HISTORY_CAP: usize = 512;
/// Snapshot format version; bumped on any layout change.
pub const SNAPSHOT_VERSION: u32 = 1;
/// Slack when asserting a distribution sums to one.
pub const SIMPLEX_TOLERANCE: f32 = 1e-5;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Deterministic per-(opponent, turn) RNG for exploration and tie-breaks.
/// Same opponent and turn always draw the same stream, which keeps
/// simulations and snapshot replays reproducible.
pub fn rng(opponent: &str, turn: Turn) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    use std::hash::Hash;
    use std::hash::Hasher;
    let ref mut hasher = std::hash::DefaultHasher::new();
    opponent.hash(hasher);
    turn.hash(hasher);
    rand::rngs::SmallRng::seed_from_u64(hasher.finish())
}

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
