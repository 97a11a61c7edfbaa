use crate::Document;

/// External collaborator that loads and persists whole documents.
///
/// The engine never opens files itself: it receives loaded [`Document`]s and
/// hands the assembled results back through this trait. `Handle` is whatever
/// identifies a document for the implementation (a path, a key, ...).
pub trait DocumentStore {
    type Handle: ?Sized;
    type Error: std::error::Error + Send + Sync + 'static;

    fn read_document(&self, handle: &Self::Handle) -> Result<Document, Self::Error>;

    fn write_document(&self, handle: &Self::Handle, document: &Document) -> Result<(), Self::Error>;
}
