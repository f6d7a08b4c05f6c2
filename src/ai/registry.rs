//! Binding of computer players to their algorithm implementations.
//!
//! How to add an algorithm:
//!
//! 1) Implement `MoveProvider` for your type in its module.
//! 2) Add an `AlgorithmFactory` entry to the built-in list with a stable `name`,
//!    or `register` one at startup.
//! 3) Keep constructors free of side effects; instances are dropped and
//!    recreated whenever player settings change.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, info};

use super::negamax::NegamaxPlayer;
use super::provider::MoveProvider;
use super::random::RandomPlayer;
use crate::error::RegistryError;
use crate::game::{Player, PlayerInfo};

/// Factory definition for constructing algorithm implementations.
#[derive(Clone, Copy)]
pub struct AlgorithmFactory {
    pub name: &'static str,
    pub summary: &'static str,
    pub make: fn(&PlayerInfo) -> Box<dyn MoveProvider>,
}

impl std::fmt::Debug for AlgorithmFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmFactory")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .finish_non_exhaustive()
    }
}

static BUILTIN_ALGORITHMS: &[AlgorithmFactory] = &[
    AlgorithmFactory {
        name: RandomPlayer::NAME,
        summary: "drops into a random non-full column",
        make: make_random_player,
    },
    AlgorithmFactory {
        name: NegamaxPlayer::NAME,
        summary: "alpha-beta search, think_depth half-moves deep",
        make: make_negamax_player,
    },
];

/// Returns the statically registered algorithm factories.
pub fn builtin_algorithms() -> &'static [AlgorithmFactory] {
    BUILTIN_ALGORITHMS
}

fn make_random_player(_player: &PlayerInfo) -> Box<dyn MoveProvider> {
    Box::new(RandomPlayer::new())
}

fn make_negamax_player(player: &PlayerInfo) -> Box<dyn MoveProvider> {
    Box::new(NegamaxPlayer::new(player.think_depth))
}

/// Resolves computer players to live provider instances, created on first use
/// and kept until `invalidate_all`.
pub struct AlgorithmRegistry {
    factories: Vec<AlgorithmFactory>,
    cache: HashMap<Player, Box<dyn MoveProvider>>,
}

impl AlgorithmRegistry {
    /// Registry holding the built-in algorithms.
    pub fn new() -> Self {
        Self::with_factories(builtin_algorithms().to_vec())
    }

    pub fn with_factories(factories: Vec<AlgorithmFactory>) -> Self {
        AlgorithmRegistry {
            factories,
            cache: HashMap::new(),
        }
    }

    /// Add a factory. A later registration shadows an earlier one with the same name.
    pub fn register(&mut self, factory: AlgorithmFactory) {
        self.factories.retain(|f| f.name != factory.name);
        self.factories.push(factory);
    }

    /// Finds a registered factory by its name.
    pub fn by_name(&self, name: &str) -> Option<&AlgorithmFactory> {
        self.factories.iter().find(|factory| factory.name == name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        factory_names(&self.factories)
    }

    /// Check that a computer player's algorithm can be instantiated, without
    /// creating it. Human players always pass.
    pub fn validate(&self, player: &PlayerInfo) -> Result<(), RegistryError> {
        match player.algorithm() {
            None => Ok(()),
            Some(algorithm) => find_factory(&self.factories, player, algorithm).map(|_| ()),
        }
    }

    pub fn is_cached(&self, seat: Player) -> bool {
        self.cache.contains_key(&seat)
    }

    /// The provider bound to `seat`. Creating it resets the player's
    /// performance counters.
    pub fn resolve<'a>(
        &'a mut self,
        seat: Player,
        player: &mut PlayerInfo,
    ) -> Result<&'a mut dyn MoveProvider, RegistryError> {
        let provider = match self.cache.entry(seat) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let algorithm = player
                    .algorithm()
                    .ok_or_else(|| RegistryError::NotComputer(player.name.clone()))?;
                let factory = find_factory(&self.factories, player, algorithm)?;
                info!(player = %player.name, algorithm, "loading algorithm");
                player.counters.reset();
                entry.insert((factory.make)(player))
            }
        };
        Ok(provider.as_mut())
    }

    /// Drop every cached provider so the next `resolve` builds fresh ones.
    pub fn invalidate_all(&mut self) {
        debug!(cached = self.cache.len(), "invalidating algorithm instances");
        self.cache.clear();
    }
}

fn factory_names(factories: &[AlgorithmFactory]) -> Vec<&'static str> {
    factories.iter().map(|factory| factory.name).collect()
}

fn find_factory<'f>(
    factories: &'f [AlgorithmFactory],
    player: &PlayerInfo,
    algorithm: &str,
) -> Result<&'f AlgorithmFactory, RegistryError> {
    factories
        .iter()
        .find(|factory| factory.name == algorithm)
        .ok_or_else(|| RegistryError::UnknownAlgorithm {
            player: player.name.clone(),
            algorithm: algorithm.to_string(),
            known: factory_names(factories),
        })
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}
