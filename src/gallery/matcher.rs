//! Binding of model mesh nodes to descriptor instances
//!
//! A mesh binds to the first instance, in descriptor order, whose name is a
//! literal prefix of the mesh name. When one instance name prefixes another
//! (`box` and `box_lid`), descriptor order decides.

use super::descriptor::ObjectInstance;
use std::collections::HashMap;

/// Returns the first instance whose name prefixes `mesh_name`
pub fn match_instance<'a>(
    mesh_name: &str,
    instances: &'a [ObjectInstance],
) -> Option<&'a ObjectInstance> {
    instances
        .iter()
        .find(|instance| mesh_name.starts_with(instance.instance.as_str()))
}

/// Index-returning variant of [`match_instance`]
pub fn match_instance_index(mesh_name: &str, instances: &[ObjectInstance]) -> Option<usize> {
    instances
        .iter()
        .position(|instance| mesh_name.starts_with(instance.instance.as_str()))
}

/// Instance name → mesh node index for the currently loaded model
#[derive(Debug, Clone, Default)]
pub struct BindingMap {
    by_instance: HashMap<String, usize>,
}

impl BindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an instance to a mesh node. A later mesh replaces an earlier one
    /// for the same instance.
    pub fn bind(&mut self, instance: &str, mesh_index: usize) {
        if let Some(previous) = self.by_instance.insert(instance.to_string(), mesh_index) {
            log::debug!(
                "Instance {} rebound from mesh {} to mesh {}",
                instance,
                previous,
                mesh_index
            );
        }
    }

    pub fn mesh_for(&self, instance: &str) -> Option<usize> {
        self.by_instance.get(instance).copied()
    }

    pub fn clear(&mut self) {
        self.by_instance.clear();
    }

    pub fn len(&self) -> usize {
        self.by_instance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_instance.is_empty()
    }

    pub fn instances(&self) -> impl Iterator<Item = &str> {
        self.by_instance.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_instance.iter().map(|(name, &idx)| (name.as_str(), idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance(name: &str) -> ObjectInstance {
        ObjectInstance {
            instance: name.to_string(),
            description: String::new(),
            size: [1.0, 1.0, 1.0],
            position: [0.0, 0.0, 0.0],
            z_rotation: 0.0,
        }
    }

    #[test]
    fn test_prefix_match() {
        let instances = vec![instance("desk_0"), instance("lamp_0")];
        let found = match_instance("lamp_0_shade", &instances).unwrap();
        assert_eq!(found.instance, "lamp_0");
        assert_eq!(match_instance_index("desk_0", &instances), Some(0));
    }

    #[test]
    fn test_no_match() {
        let instances = vec![instance("desk_0")];
        assert!(match_instance("chair_0", &instances).is_none());
        assert!(match_instance("des", &instances).is_none());
        assert!(match_instance("anything", &[]).is_none());
    }

    #[test]
    fn test_first_prefix_wins() {
        let instances = vec![instance("box"), instance("box_lid")];
        assert_eq!(match_instance("box_lid_mesh", &instances).unwrap().instance, "box");

        let reordered = vec![instance("box_lid"), instance("box")];
        assert_eq!(
            match_instance("box_lid_mesh", &reordered).unwrap().instance,
            "box_lid"
        );
    }

    #[test]
    fn test_binding_map_last_mesh_wins() {
        let mut bindings = BindingMap::new();
        bindings.bind("desk_0", 2);
        bindings.bind("desk_0", 5);
        bindings.bind("lamp_0", 1);
        assert_eq!(bindings.mesh_for("desk_0"), Some(5));
        assert_eq!(bindings.len(), 2);

        bindings.clear();
        assert!(bindings.is_empty());
        assert_eq!(bindings.mesh_for("lamp_0"), None);
    }
}
