mod negamax;
mod provider;
mod random;
pub mod registry;

pub use negamax::{ConnectFourHeuristic, Heuristic, NegamaxPlayer};
pub use provider::{InputEvent, MoveProvider};
pub use random::RandomPlayer;
pub use registry::{builtin_algorithms, AlgorithmFactory, AlgorithmRegistry};
