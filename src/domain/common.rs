/// Identifies entities that expose a stable identifier.
pub trait Identifiable {
    type Id: PartialEq;

    fn id(&self) -> &Self::Id;
}
