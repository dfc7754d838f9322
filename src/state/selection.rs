//! Current dataset/variable/style selection and cascade tracking.

use std::fmt;

/// A dataset option from the `#dataset` selector.
///
/// Option values are encoded as `"<name>;<wms_url>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOption {
    pub name: String,
    pub wms_url: String,
}

impl DatasetOption {
    pub fn new(name: impl Into<String>, wms_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            wms_url: wms_url.into(),
        }
    }

    /// Parses a selector value, splitting at the first `;`.
    ///
    /// Returns `None` when the separator is missing or either half is empty.
    pub fn parse(value: &str) -> Option<Self> {
        let (name, wms_url) = value.split_once(';')?;
        let name = name.trim();
        let wms_url = wms_url.trim();
        if name.is_empty() || wms_url.is_empty() {
            return None;
        }
        Some(Self::new(name, wms_url))
    }

    /// Encodes the option back into its selector value.
    pub fn to_option_value(&self) -> String {
        format!("{};{}", self.name, self.wms_url)
    }
}

impl fmt::Display for DatasetOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.wms_url)
    }
}

/// Position in the dataset → variable → style → layer cascade.
///
/// A change at an earlier stage invalidates every later one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CascadeStage {
    /// Nothing selected yet
    #[default]
    Idle,
    /// Dataset chosen, layer metadata requested
    DatasetSelected,
    /// Layer metadata arrived and the variable selector was rebuilt
    VariablesLoaded,
    /// A variable is current
    VariableSelected,
    /// The style selector was rebuilt for the current variable
    StylesBuilt,
    /// A style (or the server default) is current
    StyleSelected,
    /// The WMS layer for the selection is on the map
    LayerRendered,
}

impl CascadeStage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DatasetSelected => "dataset selected",
            Self::VariablesLoaded => "variables loaded",
            Self::VariableSelected => "variable selected",
            Self::StylesBuilt => "styles built",
            Self::StyleSelected => "style selected",
            Self::LayerRendered => "layer rendered",
        }
    }
}

/// The user's current selection.
///
/// `variable` and `style` always name entries of the cached layer catalog
/// once one has been loaded. `style` is `None` for layers without styles.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    pub dataset: Option<DatasetOption>,
    pub variable: Option<String>,
    pub style: Option<String>,
}

impl Selection {
    pub fn dataset_name(&self) -> Option<&str> {
        self.dataset.as_ref().map(|d| d.name.as_str())
    }

    pub fn wms_url(&self) -> Option<&str> {
        self.dataset.as_ref().map(|d| d.wms_url.as_str())
    }

    pub fn variable(&self) -> Option<&str> {
        self.variable.as_deref()
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset_option() {
        let option = DatasetOption::parse("GFS;http://example/wms").unwrap();
        assert_eq!(option.name, "GFS");
        assert_eq!(option.wms_url, "http://example/wms");
        assert_eq!(option.to_option_value(), "GFS;http://example/wms");
    }

    #[test]
    fn test_parse_splits_at_first_separator() {
        let option = DatasetOption::parse("Best;http://host/wms?a=1;b=2").unwrap();
        assert_eq!(option.name, "Best");
        assert_eq!(option.wms_url, "http://host/wms?a=1;b=2");
    }

    #[test]
    fn test_parse_rejects_malformed_values() {
        assert_eq!(DatasetOption::parse("no-separator"), None);
        assert_eq!(DatasetOption::parse(";http://example/wms"), None);
        assert_eq!(DatasetOption::parse("GFS;"), None);
    }

    #[test]
    fn test_stage_ordering() {
        assert!(CascadeStage::DatasetSelected < CascadeStage::VariablesLoaded);
        assert!(CascadeStage::StylesBuilt < CascadeStage::LayerRendered);
        assert_eq!(CascadeStage::default(), CascadeStage::Idle);
    }
}
