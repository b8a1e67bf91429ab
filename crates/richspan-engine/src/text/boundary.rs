use serde::Serialize;

/// How the edges of a span react to text inserted exactly at them.
///
/// An inclusive edge absorbs an insertion at that edge, an exclusive edge
/// does not. Insertions strictly inside a span always grow it and insertions
/// strictly outside only shift it.
///
/// | mode                 | insert at `start`     | insert at `end`      |
/// |----------------------|-----------------------|----------------------|
/// | `InclusiveInclusive` | span grows            | span grows           |
/// | `InclusiveExclusive` | span grows            | span stays           |
/// | `ExclusiveInclusive` | span shifts right     | span grows           |
/// | `ExclusiveExclusive` | span shifts right     | span stays           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryMode {
    InclusiveInclusive,
    InclusiveExclusive,
    ExclusiveInclusive,
    ExclusiveExclusive,
}

impl BoundaryMode {
    /// Build a mode from its two edges.
    pub fn from_edges(start_inclusive: bool, end_inclusive: bool) -> Self {
        match (start_inclusive, end_inclusive) {
            (true, true) => BoundaryMode::InclusiveInclusive,
            (true, false) => BoundaryMode::InclusiveExclusive,
            (false, true) => BoundaryMode::ExclusiveInclusive,
            (false, false) => BoundaryMode::ExclusiveExclusive,
        }
    }

    pub fn start_inclusive(self) -> bool {
        matches!(
            self,
            BoundaryMode::InclusiveInclusive | BoundaryMode::InclusiveExclusive
        )
    }

    pub fn end_inclusive(self) -> bool {
        matches!(
            self,
            BoundaryMode::InclusiveInclusive | BoundaryMode::ExclusiveInclusive
        )
    }

    /// Mode for the part of a span left of a cut: keeps its start edge, stops growing at the cut.
    pub fn left_of_cut(self) -> Self {
        Self::from_edges(self.start_inclusive(), false)
    }

    /// Mode for the part of a span right of a cut: keeps its end edge, never grows back over the cut.
    pub fn right_of_cut(self) -> Self {
        Self::from_edges(false, self.end_inclusive())
    }

    /// Whether text inserted at `at` would be covered by a span over `range` in this mode.
    pub fn covers_insertion(self, range: &std::ops::Range<usize>, at: usize) -> bool {
        (range.start < at && at < range.end)
            || (at == range.start && self.start_inclusive())
            || (at == range.end && range.start < at && self.end_inclusive())
    }
}
