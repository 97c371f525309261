use tracing::debug;

/// Generation tag of a persona-affecting action. Larger means initiated later.
pub type Generation = u64;

/// Current persona label plus the generation of the update that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaState {
    label: Option<String>,
    generation: Generation,
}

impl PersonaState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Replaces the label unless an update from a newer action already landed.
    /// Returns whether the candidate was applied.
    pub fn apply_persona_update(
        &mut self,
        candidate_label: impl Into<String>,
        source_generation: Generation,
    ) -> bool {
        if source_generation < self.generation {
            debug!(
                source_generation,
                current_generation = self.generation,
                "persona: dropping stale update"
            );
            return false;
        }

        self.label = Some(candidate_label.into());
        self.generation = source_generation;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_label() {
        let state = PersonaState::new();
        assert_eq!(state.label(), None);
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn newer_update_replaces_label_and_generation() {
        let mut state = PersonaState::new();
        assert!(state.apply_persona_update("Designer", 2));
        assert!(state.apply_persona_update("Creative Writer", 5));
        assert_eq!(state.label(), Some("Creative Writer"));
        assert_eq!(state.generation(), 5);
    }

    #[test]
    fn equal_generation_still_applies() {
        let mut state = PersonaState::new();
        state.apply_persona_update("Designer", 3);
        assert!(state.apply_persona_update("Content Marketer", 3));
        assert_eq!(state.label(), Some("Content Marketer"));
    }

    #[test]
    fn late_older_update_is_dropped() {
        let mut state = PersonaState::new();
        state.apply_persona_update("Designer", 3);

        assert!(!state.apply_persona_update("General User", 2));
        assert_eq!(state.label(), Some("Designer"));
        assert_eq!(state.generation(), 3);
    }
}
