use themesync_model::{Document, DocumentStore};
use thiserror::Error;

use crate::config::StoreKind;
use crate::session::AssembledStores;

/// Persisting one store failed. Stores committed before the failure stay
/// committed; calling [`PendingCommit::commit`] again retries only the rest.
#[derive(Debug, Error)]
#[error("failed to persist {store} store `{document}`")]
pub struct CommitError {
    pub store: StoreKind,
    pub document: String,
    pub source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

/// The two assembled documents awaiting persistence, primary first.
#[derive(Debug)]
pub struct PendingCommit {
    primary: Document,
    companion: Document,
    primary_committed: bool,
    companion_committed: bool,
}

impl PendingCommit {
    pub fn new(stores: AssembledStores) -> Self {
        Self {
            primary: stores.primary,
            companion: stores.companion,
            primary_committed: false,
            companion_committed: false,
        }
    }

    pub fn document(&self, store: StoreKind) -> &Document {
        match store {
            StoreKind::Primary => &self.primary,
            StoreKind::Companion => &self.companion,
        }
    }

    pub fn is_committed(&self, store: StoreKind) -> bool {
        match store {
            StoreKind::Primary => self.primary_committed,
            StoreKind::Companion => self.companion_committed,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.primary_committed && self.companion_committed
    }

    /// Write the primary store, then the companion store, skipping whichever
    /// is already committed.
    pub fn commit<S: DocumentStore>(
        &mut self,
        store: &S,
        primary: &S::Handle,
        companion: &S::Handle,
    ) -> Result<(), CommitError> {
        if !self.primary_committed {
            write(store, StoreKind::Primary, primary, &self.primary)?;
            self.primary_committed = true;
        }
        if !self.companion_committed {
            write(store, StoreKind::Companion, companion, &self.companion)?;
            self.companion_committed = true;
        }
        Ok(())
    }

    pub fn into_documents(self) -> AssembledStores {
        AssembledStores {
            primary: self.primary,
            companion: self.companion,
        }
    }
}

fn write<S: DocumentStore>(
    store: &S,
    kind: StoreKind,
    handle: &S::Handle,
    document: &Document,
) -> Result<(), CommitError> {
    store
        .write_document(handle, document)
        .map_err(|err| CommitError {
            store: kind,
            document: document.name().to_string(),
            source: Box::new(err),
        })?;
    log::info!("committed {kind} store `{}`", document.name());
    Ok(())
}
