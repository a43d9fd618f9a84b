use slotmap::new_key_type;

new_key_type! {
    /// Opaque identifier for a node stored in a scene arena. Ids are
    /// generational: once a node is destroyed its id never resolves again,
    /// which makes an id behave like a weak reference.
    pub struct NodeId;
}
