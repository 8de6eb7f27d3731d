//! Undo/Redo über Vorwärts-/Umkehr-Patches.
//!
//! Die History kennt das Modell nur über [`Patchable`]. Jeder Eintrag hält
//! beide Richtungen als reine Daten, Undo und Redo spielen sie nur noch ab.

use crate::core::{LadderProgram, Patch, PatchError};

/// Standard-Tiefe der Undo-History.
pub const DEFAULT_HISTORY_DEPTH: usize = 200;

/// Modell, auf das die History Patches anwenden kann.
pub trait Patchable {
    /// Patch-Typ des Modells
    type Patch: Clone;
    /// Fehler beim Anwenden eines Patches
    type Error;

    /// Wendet einen Patch atomar an (kein Teilzustand bei Fehler).
    fn apply(&mut self, patch: &Self::Patch) -> Result<(), Self::Error>;

    /// Liefert den Patch, der `patch` rückgängig macht.
    fn invert(patch: &Self::Patch) -> Self::Patch;
}

impl Patchable for LadderProgram {
    type Patch = Patch;
    type Error = PatchError;

    fn apply(&mut self, patch: &Patch) -> Result<(), PatchError> {
        self.apply_patch(patch)
    }

    fn invert(patch: &Patch) -> Patch {
        patch.inverse()
    }
}

/// Unveränderliches Paar aus Vorwärts- und Umkehr-Patch.
#[derive(Debug, Clone)]
pub struct HistoryEntry<P> {
    /// Beschreibung für Log/Anzeige
    pub label: String,
    /// Stellt den Zustand nach der Bearbeitung her
    pub forward: P,
    /// Stellt den Zustand vor der Bearbeitung her
    pub inverse: P,
}

/// Undo/Redo-Stacks mit begrenzter Tiefe.
#[derive(Debug, Clone)]
pub struct EditHistory<P> {
    undo_stack: Vec<HistoryEntry<P>>,
    redo_stack: Vec<HistoryEntry<P>>,
    max_depth: usize,
}

impl<P: Clone> Default for EditHistory<P> {
    fn default() -> Self {
        Self::new_with_capacity(DEFAULT_HISTORY_DEPTH)
    }
}

impl<P: Clone> EditHistory<P> {
    /// Erstellt eine leere History mit maximaler Tiefe.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Wendet `forward` an und legt das Patch-Paar auf den Undo-Stack.
    ///
    /// Eine neue Bearbeitung verwirft den Redo-Stack. Schlägt das Anwenden
    /// fehl, bleiben Modell und History unverändert.
    pub fn apply<M>(&mut self, model: &mut M, label: impl Into<String>, forward: P) -> Result<(), M::Error>
    where
        M: Patchable<Patch = P>,
    {
        let inverse = M::invert(&forward);
        model.apply(&forward)?;
        self.push_undo(HistoryEntry {
            label: label.into(),
            forward,
            inverse,
        });
        self.redo_stack.clear();
        Ok(())
    }

    /// Nimmt die letzte Bearbeitung zurück.
    ///
    /// Liefert `Ok(None)` bei leerem Stack, sonst die Beschreibung des
    /// zurückgenommenen Eintrags.
    pub fn undo<M>(&mut self, model: &mut M) -> Result<Option<String>, M::Error>
    where
        M: Patchable<Patch = P>,
    {
        let Some(entry) = self.undo_stack.pop() else {
            return Ok(None);
        };
        if let Err(err) = model.apply(&entry.inverse) {
            self.undo_stack.push(entry);
            return Err(err);
        }
        let label = entry.label.clone();
        self.redo_stack.push(entry);
        Ok(Some(label))
    }

    /// Stellt die zuletzt zurückgenommene Bearbeitung wieder her.
    pub fn redo<M>(&mut self, model: &mut M) -> Result<Option<String>, M::Error>
    where
        M: Patchable<Patch = P>,
    {
        let Some(entry) = self.redo_stack.pop() else {
            return Ok(None);
        };
        if let Err(err) = model.apply(&entry.forward) {
            self.redo_stack.push(entry);
            return Err(err);
        }
        let label = entry.label.clone();
        self.push_undo(entry);
        Ok(Some(label))
    }

    fn push_undo(&mut self, entry: HistoryEntry<P>) {
        if self.undo_stack.len() >= self.max_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(entry);
    }

    /// Gibt zurück, ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Gibt zurück, ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Anzahl der Undo-Einträge.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Anzahl der Redo-Einträge.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Beschreibungen der Undo-Einträge, neueste zuletzt.
    pub fn undo_labels(&self) -> impl Iterator<Item = &str> {
        self.undo_stack.iter().map(|e| e.label.as_str())
    }

    /// Ändert die maximale Tiefe; überzählige alte Undo-Einträge entfallen.
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.max(1);
        let excess = self.undo_stack.len().saturating_sub(self.max_depth);
        self.undo_stack.drain(..excess);
    }

    /// Leert beide Stacks (z.B. nach Laden einer Vorlage).
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimales Modell: ein Zähler mit Additions-Patches.
    #[derive(Debug, Default, PartialEq)]
    struct Counter(i64);

    impl Patchable for Counter {
        type Patch = i64;
        type Error = String;

        fn apply(&mut self, patch: &i64) -> Result<(), String> {
            let next = self.0 + patch;
            if next < 0 {
                return Err(format!("negativ: {next}"));
            }
            self.0 = next;
            Ok(())
        }

        fn invert(patch: &i64) -> i64 {
            -patch
        }
    }

    #[test]
    fn test_apply_undo_redo_roundtrip() {
        let mut model = Counter::default();
        let mut history = EditHistory::new_with_capacity(10);

        history.apply(&mut model, "plus 5", 5).expect("apply");
        history.apply(&mut model, "plus 2", 2).expect("apply");
        assert_eq!(model.0, 7);

        assert_eq!(history.undo(&mut model), Ok(Some("plus 2".to_string())));
        assert_eq!(model.0, 5);
        assert!(history.can_redo());

        assert_eq!(history.redo(&mut model), Ok(Some("plus 2".to_string())));
        assert_eq!(model.0, 7);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut model = Counter(3);
        let mut history: EditHistory<i64> = EditHistory::default();

        assert_eq!(history.undo(&mut model), Ok(None));
        assert_eq!(history.redo(&mut model), Ok(None));
        assert_eq!(model.0, 3);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut model = Counter::default();
        let mut history = EditHistory::new_with_capacity(10);

        history.apply(&mut model, "a", 1).expect("apply");
        history.undo(&mut model).expect("undo");
        assert_eq!(history.redo_len(), 1);

        history.apply(&mut model, "b", 4).expect("apply");
        assert_eq!(history.redo_len(), 0);
        assert_eq!(model.0, 4);
    }

    #[test]
    fn test_failed_apply_leaves_history_untouched() {
        let mut model = Counter(1);
        let mut history = EditHistory::new_with_capacity(10);

        assert!(history.apply(&mut model, "minus 3", -3).is_err());
        assert_eq!(model.0, 1);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_depth_limit_drops_oldest() {
        let mut model = Counter::default();
        let mut history = EditHistory::new_with_capacity(2);

        for step in 1..=3 {
            history.apply(&mut model, format!("#{step}"), 1).expect("apply");
        }

        let labels: Vec<&str> = history.undo_labels().collect();
        assert_eq!(labels, vec!["#2", "#3"]);
    }
}
