use crate::entity::{Entity, Identifier};
use crate::error::RepositoryError;
use crate::id_manager::IdManager;

/// CRUD operations shared by every backend.
///
/// A repository is bound to one entity shape `E`. Mutating calls take
/// `&mut self`; wrap a repository in a `Mutex` to share it between threads.
pub trait Repository<E: Entity> {
    /// Identifier access for the bound shape.
    fn id_manager(&self) -> &IdManager<E>;

    /// Load exactly one entity. Fails with `NotFound` if nothing is stored.
    fn find(&self, id: &E::Id) -> Result<E, RepositoryError>;

    /// Every stored entity of the bound kind. Order is backend-defined.
    fn find_all(&self) -> Result<Vec<E>, RepositoryError>;

    /// Store under a freshly generated identifier and stamp it onto `entity`.
    fn create(&mut self, entity: &mut E) -> Result<(), RepositoryError>;

    /// Store under `id`, overwriting any existing record, and stamp it onto `entity`.
    fn create_with_id(&mut self, entity: &mut E, id: E::Id) -> Result<(), RepositoryError>;

    /// Overwrite the record at the entity's current identifier.
    fn update(&mut self, entity: &E) -> Result<(), RepositoryError>;

    /// Remove the record at the entity's current identifier. Absent records are not an error.
    fn delete(&mut self, entity: &E) -> Result<(), RepositoryError>;

    /// Kind name the repository stores records under.
    fn kind<'a>(&'a self) -> &'a str
    where
        E: 'a,
    {
        self.id_manager().kind()
    }

    /// `find` with a dynamically typed identifier.
    fn find_identifier(&self, id: Identifier) -> Result<E, RepositoryError> {
        let id = self.id_manager().convert(id)?;
        self.find(&id)
    }
}
