use crate::config::BreakpointConfig;

/// Breakpoint configurations kept in ascending threshold order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakpointTable {
    configs: Vec<BreakpointConfig>,
}

impl BreakpointTable {
    pub fn new(configs: Vec<BreakpointConfig>) -> Self {
        let mut table = Self { configs };
        table.sort();
        table
    }

    /// Stable ascending sort; equal thresholds keep their declaration order.
    pub fn sort(&mut self) {
        self.configs
            .sort_by(|a, b| a.threshold.total_cmp(&b.threshold));
    }

    /// Mobile-first cascade: the last config whose threshold is strictly below
    /// `target_width` wins. `None` means no layout for this width.
    pub fn resolve(&self, target_width: f64) -> Option<&BreakpointConfig> {
        self.configs
            .iter()
            .rev()
            .find(|config| target_width > config.threshold)
    }

    pub fn configs(&self) -> &[BreakpointConfig] {
        &self.configs
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(thresholds: &[f64]) -> BreakpointTable {
        BreakpointTable::new(
            thresholds
                .iter()
                .enumerate()
                .map(|(idx, t)| BreakpointConfig::fixed(*t, idx as u32 + 1))
                .collect(),
        )
    }

    #[test]
    fn resolve_follows_cascade() {
        let table = table(&[1200.0, 0.0, 600.0]);

        assert_eq!(table.resolve(500.0).unwrap().threshold, 0.0);
        assert_eq!(table.resolve(700.0).unwrap().threshold, 600.0);
        assert_eq!(table.resolve(1200.0).unwrap().threshold, 600.0);
        assert_eq!(table.resolve(1201.0).unwrap().threshold, 1200.0);
    }

    #[test]
    fn resolve_below_smallest_threshold_is_none() {
        let table = table(&[100.0]);
        assert!(table.resolve(50.0).is_none());
        assert!(table.resolve(100.0).is_none());
        assert!(BreakpointTable::default().resolve(1e6).is_none());
    }

    #[test]
    fn equal_thresholds_prefer_later_declaration() {
        let table = BreakpointTable::new(vec![
            BreakpointConfig::fixed(300.0, 2),
            BreakpointConfig::fixed(0.0, 1),
            BreakpointConfig::fixed(300.0, 5),
        ]);

        let thresholds: Vec<f64> = table.configs().iter().map(|c| c.threshold).collect();
        assert_eq!(thresholds, vec![0.0, 300.0, 300.0]);
        assert_eq!(
            table.resolve(400.0).unwrap().grid,
            crate::config::GridSpec::Fixed { columns: 5 }
        );
    }
}
