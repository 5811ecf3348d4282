//! Trading signal prediction
//!
//! A prediction maps an asset, a time scale and its price history to one
//! of three opaque signals. Models are resolved per `(asset, scale)` from a
//! [`ModelRegistry`]; the registry owns no inference logic itself.

pub mod history;

pub use history::{load_history, parse_history, Candle};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::error::PredictError;

/// Prediction outcome. The letters carry no meaning inside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    C,
    L,
    S,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::C => "C",
            Signal::L => "L",
            Signal::S => "S",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown signal '{0}', expected one of C, L, S")]
pub struct ParseSignalError(String);

impl FromStr for Signal {
    type Err = ParseSignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "C" => Ok(Signal::C),
            "L" => Ok(Signal::L),
            "S" => Ok(Signal::S),
            _ => Err(ParseSignalError(s.to_string())),
        }
    }
}

/// A trained model for one asset at one time scale.
pub trait Model {
    fn predict(&self, history: &[Candle]) -> anyhow::Result<Signal>;
}

impl<F> Model for F
where
    F: Fn(&[Candle]) -> anyhow::Result<Signal>,
{
    fn predict(&self, history: &[Candle]) -> anyhow::Result<Signal> {
        self(history)
    }
}

/// Placeholder model that always answers with the same signal.
#[derive(Debug, Clone, Copy)]
pub struct ConstantModel(pub Signal);

impl Default for ConstantModel {
    fn default() -> Self {
        Self(Signal::C)
    }
}

impl Model for ConstantModel {
    fn predict(&self, _history: &[Candle]) -> anyhow::Result<Signal> {
        Ok(self.0)
    }
}

/// Models keyed by `(asset, scale)`, with an optional fallback used when no
/// exact entry exists.
#[derive(Default)]
pub struct ModelRegistry {
    models: HashMap<(String, String), Box<dyn Model>>,
    fallback: Option<Box<dyn Model>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        asset: impl Into<String>,
        scale: impl Into<String>,
        model: impl Model + 'static,
    ) -> &mut Self {
        self.models
            .insert((asset.into(), scale.into()), Box::new(model));
        self
    }

    pub fn with_fallback(mut self, model: impl Model + 'static) -> Self {
        self.fallback = Some(Box::new(model));
        self
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    fn resolve(&self, asset: &str, scale: &str) -> Option<&dyn Model> {
        self.models
            .get(&(asset.to_string(), scale.to_string()))
            .or(self.fallback.as_ref())
            .map(|model| &**model)
    }

    /// Run the model registered for `asset` at `scale` on `data`.
    ///
    /// A model fault is logged with its category and handed back as is;
    /// there is no default signal.
    pub fn predict(&self, asset: &str, scale: &str, data: &[Candle]) -> Result<Signal, PredictError> {
        let model = self
            .resolve(asset, scale)
            .ok_or_else(|| PredictError::ModelNotFound {
                asset: asset.to_string(),
                scale: scale.to_string(),
            })?;

        match model.predict(data) {
            Ok(signal) => {
                debug!(asset, scale, candles = data.len(), %signal, "Prediction");
                Ok(signal)
            }
            Err(fault) => {
                error!(
                    asset,
                    scale,
                    category = fault_category(&fault),
                    "Prediction failed: {:#}",
                    fault
                );
                Err(PredictError::Model(fault))
            }
        }
    }
}

/// Coarse name of what went wrong inside a model, for logging.
pub fn fault_category(fault: &anyhow::Error) -> &'static str {
    if fault.downcast_ref::<std::io::Error>().is_some() {
        "io"
    } else if fault.downcast_ref::<csv::Error>().is_some() {
        "csv"
    } else if fault.downcast_ref::<serde_json::Error>().is_some() {
        "json"
    } else if fault.downcast_ref::<ParseSignalError>().is_some() {
        "signal"
    } else {
        "model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn candles(count: usize) -> Vec<Candle> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        (0..count)
            .map(|i| Candle {
                date_time: start + chrono::Duration::hours(i as i64),
                open: 100.0,
                high: 101.0,
                low: 99.0,
                close: 100.0 + i as f64,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn test_signal_round_trips_through_str() {
        for signal in [Signal::C, Signal::L, Signal::S] {
            assert_eq!(signal.to_string().parse::<Signal>().unwrap(), signal);
        }
        assert_eq!(" l ".parse::<Signal>().unwrap(), Signal::L);
        assert!("X".parse::<Signal>().is_err());
    }

    #[test]
    fn test_signal_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Signal::S).unwrap(), "\"S\"");
    }

    #[test]
    fn test_registry_resolves_exact_model() {
        let mut registry = ModelRegistry::new();
        registry
            .register("SBER", "H", ConstantModel(Signal::L))
            .register("SBER", "D", ConstantModel(Signal::S));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.predict("SBER", "H", &candles(3)).unwrap(), Signal::L);
        assert_eq!(registry.predict("SBER", "D", &candles(3)).unwrap(), Signal::S);
    }

    #[test]
    fn test_registry_without_model_fails() {
        let registry = ModelRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.predict("GAZP", "H", &[]),
            Err(PredictError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_registry_uses_fallback() {
        let registry = ModelRegistry::new().with_fallback(ConstantModel::default());
        assert_eq!(registry.predict("GAZP", "H", &[]).unwrap(), Signal::C);
    }

    #[test]
    fn test_closure_models_see_history() {
        let mut registry = ModelRegistry::new();
        registry.register("LKOH", "D", |history: &[Candle]| -> anyhow::Result<Signal> {
            let last = history.last().ok_or_else(|| anyhow::anyhow!("empty history"))?;
            Ok(if last.close > last.open {
                Signal::L
            } else {
                Signal::S
            })
        });

        assert_eq!(registry.predict("LKOH", "D", &candles(5)).unwrap(), Signal::L);
    }

    #[test]
    fn test_model_fault_is_returned_unmodified() {
        let mut registry = ModelRegistry::new();
        registry.register("LKOH", "D", |_: &[Candle]| -> anyhow::Result<Signal> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "weights missing").into())
        });

        let err = registry.predict("LKOH", "D", &candles(1)).unwrap_err();
        match err {
            PredictError::Model(fault) => {
                assert_eq!(fault_category(&fault), "io");
                let io = fault.downcast_ref::<std::io::Error>().unwrap();
                assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
