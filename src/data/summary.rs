//! Per-classification counts for the header bar and exports.

use super::signal::{Classification, Classified, SignalView};

/// Number of signals in each classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalSummary {
    pub total: usize,
    pub success: usize,
    pub warning: usize,
    pub error: usize,
    pub undefined: usize,
    pub unclassified: usize,
}

impl SignalSummary {
    /// Count the given signals (dependencies are not included).
    pub fn from_signals(signals: &[SignalView]) -> Self {
        let mut summary = Self::default();
        for signal in signals {
            summary.add(signal.classification());
        }
        summary
    }

    /// Count every node of a dependency tree, root included.
    pub fn from_tree(root: &SignalView) -> Self {
        let mut summary = Self::default();
        for (_, node) in root.walk() {
            summary.add(node.classification());
        }
        summary
    }

    fn add(&mut self, class: Classification) {
        self.total += 1;
        match class {
            Classification::Success => self.success += 1,
            Classification::Warning => self.warning += 1,
            Classification::Error => self.error += 1,
            Classification::Undefined => self.undefined += 1,
            Classification::Unclassified => self.unclassified += 1,
        }
    }

    /// Worst classification present, used for the overall status dot.
    pub fn worst(&self) -> Option<Classification> {
        if self.error > 0 {
            Some(Classification::Error)
        } else if self.warning > 0 || self.undefined > 0 {
            Some(Classification::Warning)
        } else if self.unclassified > 0 {
            Some(Classification::Unclassified)
        } else if self.success > 0 {
            Some(Classification::Success)
        } else {
            None
        }
    }
}
