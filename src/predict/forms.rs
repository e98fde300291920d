//! Keeps a predictor for each predictor form handed out to a client.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use rand::Rng;

use crate::{Error, auth::UserID, predict::predictor::Predictor};

/// Identifies a predictor form rendered for a client.
///
/// Ids are random so that one guest cannot guess the form of another.
pub type FormId = u64;

/// How many forms are remembered before the least recently used are forgotten.
pub const DEFAULT_FORM_CAPACITY: usize = 1024;

#[derive(Debug)]
struct OpenForm {
    owner: Option<UserID>,
    predictor: Predictor,
}

#[derive(Debug)]
struct Registry {
    capacity: usize,
    forms: HashMap<FormId, OpenForm>,
    // Least recently used first.
    recent: VecDeque<FormId>,
}

impl Registry {
    fn touch(&mut self, id: FormId) {
        if let Some(position) = self.recent.iter().position(|&recent| recent == id) {
            self.recent.remove(position);
        }
        self.recent.push_back(id);
    }
}

/// The predictor forms that are currently open, shared between requests.
///
/// Each form belongs to the session that opened it, either a user or a guest,
/// and can only be used by that session. Once `capacity` forms are open,
/// opening another forgets the one that was used least recently.
#[derive(Debug, Clone)]
pub struct PredictionForms {
    registry: Arc<Mutex<Registry>>,
}

impl PredictionForms {
    /// Create an empty registry that remembers up to `capacity` forms.
    pub fn new(capacity: usize) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                capacity: capacity.max(1),
                forms: HashMap::new(),
                recent: VecDeque::new(),
            })),
        }
    }

    /// Open a new form with an idle predictor for `owner`.
    ///
    /// # Errors
    /// Returns [Error::PredictionFormLockError] if the lock is poisoned.
    pub fn open(&self, owner: Option<UserID>) -> Result<FormId, Error> {
        let mut registry = self.lock()?;

        while registry.recent.len() >= registry.capacity {
            if let Some(stale) = registry.recent.pop_front() {
                registry.forms.remove(&stale);
                tracing::debug!("forgot prediction form {stale}");
            }
        }

        let mut rng = rand::thread_rng();
        let id = loop {
            let id: FormId = rng.r#gen();
            if !registry.forms.contains_key(&id) {
                break id;
            }
        };
        registry.forms.insert(
            id,
            OpenForm {
                owner,
                predictor: Predictor::new(),
            },
        );
        registry.recent.push_back(id);

        Ok(id)
    }

    /// Run `f` with the predictor of form `id`.
    ///
    /// The lock is held only while `f` runs, so `f` must not block.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UnknownPredictionForm] if `id` is not open or was opened by
    ///   someone other than `owner`,
    /// - or [Error::PredictionFormLockError] if the lock is poisoned.
    pub fn with_predictor<T>(
        &self,
        id: FormId,
        owner: Option<UserID>,
        f: impl FnOnce(&mut Predictor) -> T,
    ) -> Result<T, Error> {
        let mut registry = self.lock()?;

        let Some(form) = registry.forms.get_mut(&id) else {
            return Err(Error::UnknownPredictionForm(id));
        };

        if form.owner != owner {
            tracing::warn!("prediction form {id} used by a session that did not open it");
            return Err(Error::UnknownPredictionForm(id));
        }

        let result = f(&mut form.predictor);
        registry.touch(id);

        Ok(result)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Registry>, Error> {
        self.registry
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire prediction form lock: {error}"))
            .map_err(|_| Error::PredictionFormLockError)
    }
}

impl Default for PredictionForms {
    fn default() -> Self {
        Self::new(DEFAULT_FORM_CAPACITY)
    }
}
