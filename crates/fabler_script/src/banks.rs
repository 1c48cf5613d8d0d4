//! Response bank storage and random phrase selection.

use fabler_core::ResponseBank;
use fabler_error::{ScriptError, ScriptErrorKind};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::debug;

/// Named phrase lists populated by ADD lines.
///
/// Selection is uniform over a bank's contents at the time of the pick. The
/// random source is owned by the store so that a seeded store replays the
/// same choices.
///
/// # Examples
///
/// ```
/// use fabler_core::ResponseBank;
/// use fabler_script::ResponseBankStore;
///
/// let mut banks = ResponseBankStore::seeded(7);
/// assert!(banks.pick(ResponseBank::StoryIntros).is_err());
///
/// banks.load(ResponseBank::StoryIntros, vec!["Once upon a time".to_string()]);
/// assert_eq!(banks.pick(ResponseBank::StoryIntros).unwrap(), "Once upon a time");
/// ```
#[derive(Debug, Clone)]
pub struct ResponseBankStore {
    banks: HashMap<ResponseBank, Vec<String>>,
    rng: ChaCha8Rng,
}

impl ResponseBankStore {
    /// Create an empty store seeded from system entropy.
    pub fn new() -> Self {
        Self::with_rng(ChaCha8Rng::from_entropy())
    }

    /// Create an empty store with reproducible picks.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(rng: ChaCha8Rng) -> Self {
        Self {
            banks: HashMap::new(),
            rng,
        }
    }

    /// Replace the contents of `bank`.
    pub fn load(&mut self, bank: ResponseBank, phrases: Vec<String>) {
        debug!(%bank, count = phrases.len(), "Loaded response bank");
        self.banks.insert(bank, phrases);
    }

    /// Current phrases of `bank`, if it was ever loaded.
    pub fn phrases(&self, bank: ResponseBank) -> Option<&[String]> {
        self.banks.get(&bank).map(Vec::as_slice)
    }

    /// Whether an ADD has populated `bank`.
    pub fn is_loaded(&self, bank: ResponseBank) -> bool {
        self.banks.contains_key(&bank)
    }

    /// Pick one phrase from `bank` uniformly at random.
    ///
    /// # Errors
    ///
    /// Fails when the bank was never loaded or holds no phrases.
    pub fn pick(&mut self, bank: ResponseBank) -> Result<String, ScriptError> {
        let phrases = self
            .banks
            .get(&bank)
            .ok_or_else(|| ScriptError::new(ScriptErrorKind::BankNotLoaded(bank.to_string())))?;
        phrases
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| ScriptError::new(ScriptErrorKind::BankEmpty(bank.to_string())))
    }
}

impl Default for ResponseBankStore {
    fn default() -> Self {
        Self::new()
    }
}
