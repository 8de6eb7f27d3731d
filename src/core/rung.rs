//! Strompfade (Rungs) und parallele Verzweigungen.

use super::catalog::ElementClass;
use super::element::{BranchId, Element, ElementId, RungId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Standardbreite eines Strompfads in Spalten.
pub const DEFAULT_RUNG_WIDTH: u16 = 10;

/// Parallele Verzweigung innerhalb eines Strompfads.
///
/// Die Verzweigung beginnt vor Spalte `start_column` und vereinigt sich nach
/// Spalte `end_column - 1` wieder mit dem Hauptpfad (halboffenes Intervall).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Eindeutige ID
    pub id: BranchId,
    /// Erste Spalte der Verzweigung
    pub start_column: u16,
    /// Spalte nach der Wiedervereinigung
    pub end_column: u16,
    /// Elemente der Verzweigung, nach Spalte sortiert
    pub elements: Vec<Element>,
}

impl Branch {
    /// Erstellt eine leere Verzweigung.
    pub fn new(id: BranchId, start_column: u16, end_column: u16) -> Self {
        Self {
            id,
            start_column,
            end_column,
            elements: Vec::new(),
        }
    }

    /// Prüft, ob die Spalte im Bereich der Verzweigung liegt.
    pub fn contains_column(&self, column: u16) -> bool {
        (self.start_column..self.end_column).contains(&column)
    }

    /// Zwei Verzweigungen dürfen sich nur vollständig (gleiche Spanne) oder
    /// gar nicht überlappen.
    pub fn conflicts_with(&self, start_column: u16, end_column: u16) -> bool {
        let same = self.start_column == start_column && self.end_column == end_column;
        let disjoint = end_column <= self.start_column || start_column >= self.end_column;
        !(same || disjoint)
    }
}

/// Ein Strompfad von der linken zur rechten Schiene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rung {
    /// Eindeutige ID
    pub id: RungId,
    /// Anzahl Spalten
    #[serde(default = "default_width")]
    pub width: u16,
    /// Elemente des Hauptpfads, nach Spalte sortiert
    pub elements: Vec<Element>,
    /// Verzweigungen, nach Startspalte sortiert
    #[serde(default)]
    pub branches: Vec<Branch>,
}

fn default_width() -> u16 {
    DEFAULT_RUNG_WIDTH
}

impl Rung {
    /// Erstellt einen leeren Strompfad.
    pub fn new(id: RungId, width: u16) -> Self {
        Self {
            id,
            width,
            elements: Vec::new(),
            branches: Vec::new(),
        }
    }

    /// Verzweigung nach ID.
    pub fn branch(&self, id: BranchId) -> Option<&Branch> {
        self.branches.iter().find(|b| b.id == id)
    }

    /// Elementliste eines Pfads (`None` = Hauptpfad).
    pub fn path(&self, branch: Option<BranchId>) -> Option<&Vec<Element>> {
        match branch {
            None => Some(&self.elements),
            Some(id) => self.branch(id).map(|b| &b.elements),
        }
    }

    /// Veränderbare Elementliste eines Pfads.
    pub fn path_mut(&mut self, branch: Option<BranchId>) -> Option<&mut Vec<Element>> {
        match branch {
            None => Some(&mut self.elements),
            Some(id) => self
                .branches
                .iter_mut()
                .find(|b| b.id == id)
                .map(|b| &mut b.elements),
        }
    }

    /// Gültiger Spaltenbereich eines Pfads.
    pub fn column_range(&self, branch: Option<BranchId>) -> Option<std::ops::Range<u16>> {
        match branch {
            None => Some(0..self.width),
            Some(id) => self.branch(id).map(|b| b.start_column..b.end_column),
        }
    }

    /// Element an einer Spalte eines Pfads.
    pub fn element_at(&self, branch: Option<BranchId>, column: u16) -> Option<&Element> {
        self.path(branch)?
            .iter()
            .find(|e| e.position.column == column)
    }

    /// Alle Elemente (Hauptpfad, dann Verzweigungen).
    pub fn all_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .chain(self.branches.iter().flat_map(|b| b.elements.iter()))
    }

    /// Alle Elemente veränderbar.
    pub fn all_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.elements
            .iter_mut()
            .chain(self.branches.iter_mut().flat_map(|b| b.elements.iter_mut()))
    }

    /// Element nach ID.
    pub fn find(&self, id: ElementId) -> Option<&Element> {
        self.all_elements().find(|e| e.id == id)
    }

    /// Fügt eine Verzweigung sortiert ein.
    pub fn insert_branch(&mut self, branch: Branch) {
        let idx = self
            .branches
            .partition_point(|b| (b.start_column, b.id) < (branch.start_column, branch.id));
        self.branches.insert(idx, branch);
    }

    /// Entfernt eine Verzweigung samt Elementen.
    pub fn remove_branch(&mut self, id: BranchId) -> Option<Branch> {
        let idx = self.branches.iter().position(|b| b.id == id)?;
        Some(self.branches.remove(idx))
    }

    /// Prüft, ob der Strompfad eine Ausgangsanweisung enthält.
    pub fn has_output(&self) -> bool {
        self.all_elements().any(|e| e.kind.is_output())
    }
}

/// Fügt ein Element spaltensortiert in einen Pfad ein.
pub fn insert_sorted(path: &mut Vec<Element>, element: Element) {
    let idx = path.partition_point(|e| e.position.column < element.position.column);
    path.insert(idx, element);
}

/// Prüft die Ausgangsstufe eines Pfads: rechts einer Ausgangsanweisung darf
/// keine Eingangsanweisung mehr folgen.
pub fn output_stage_ok(columns: impl IntoIterator<Item = (u16, ElementClass)>) -> bool {
    let mut sorted: Vec<(u16, ElementClass)> = columns.into_iter().collect();
    sorted.sort_by_key(|(column, _)| *column);
    let mut seen_output = false;
    for (_, class) in sorted {
        match class {
            ElementClass::Output => seen_output = true,
            ElementClass::Input if seen_output => return false,
            ElementClass::Input => {}
        }
    }
    true
}

/// Belegung eines Elements: Pfad (`None` = Hauptpfad), Spalte und Klasse.
pub type PathSlot = (Option<BranchId>, u16, ElementClass);

/// Prüft die Ausgangsstufe über alle Pfade eines Strompfads.
///
/// Innerhalb eines Pfads gilt [`output_stage_ok`]. Pfadübergreifend zählt
/// ein Verzweigungselement für die ganze Spanne seiner Verzweigung: keine
/// Eingangsanweisung darf erst hinter dem Ende einer Ausgangsanweisung
/// beginnen.
pub fn rung_output_stage_ok(rung: &Rung, slots: &[PathSlot]) -> bool {
    let mut paths: BTreeMap<Option<BranchId>, Vec<(u16, ElementClass)>> = BTreeMap::new();
    for &(branch, column, class) in slots {
        paths.entry(branch).or_default().push((column, class));
    }
    if !paths.into_values().all(output_stage_ok) {
        return false;
    }

    let span = |branch: Option<BranchId>, column: u16| match branch.and_then(|id| rung.branch(id)) {
        Some(b) => (b.start_column, b.end_column.saturating_sub(1)),
        None => (column, column),
    };
    let earliest_output_end = slots
        .iter()
        .filter(|(_, _, class)| *class == ElementClass::Output)
        .map(|&(branch, column, _)| span(branch, column).1)
        .min();
    let Some(output_end) = earliest_output_end else {
        return true;
    };
    slots
        .iter()
        .filter(|(_, _, class)| *class == ElementClass::Input)
        .all(|&(branch, column, _)| span(branch, column).0 <= output_end)
}
