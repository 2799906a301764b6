//! Treatment-train configuration schema.
//!
//! The YAML schema enumerates explicitly which optional sections of the
//! train exist and which model variants they use; variant tokens are plain
//! strings in the file and are resolved to typed selectors exactly once,
//! before any construction happens.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wt_components::{NfModel, RoModel};
use wt_props::Basis;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainConfig {
    pub name: String,
    #[serde(default)]
    pub pretreatment: PretreatmentConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desalination: Option<DesalinationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posttreatment: Option<PosttreatmentConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PretreatmentConfig {
    #[serde(default = "default_true")]
    pub has_bypass: bool,
    /// Nanofiltration variant token: "ZO" or "Sep".
    #[serde(default = "default_nf_model")]
    pub nf_model: String,
    /// Chemistry basis token: "ion", "salt", or "TDS".
    #[serde(default = "default_basis")]
    pub basis: String,
}

impl Default for PretreatmentConfig {
    fn default() -> Self {
        Self {
            has_bypass: true,
            nf_model: default_nf_model(),
            basis: default_basis(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesalinationConfig {
    #[serde(default)]
    pub two_stage: bool,
    /// Reverse-osmosis variant token: "0D" or "Sep".
    #[serde(default = "default_ro_model")]
    pub ro_model: String,
    #[serde(default = "default_stage1_bar")]
    pub stage1_pressure_bar: f64,
    #[serde(default = "default_stage2_bar")]
    pub stage2_pressure_bar: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PosttreatmentConfig {
    #[serde(default)]
    pub lime_softening: bool,
    #[serde(default)]
    pub chlorination: bool,
}

fn default_true() -> bool {
    true
}

fn default_nf_model() -> String {
    "ZO".to_string()
}

fn default_basis() -> String {
    "ion".to_string()
}

fn default_ro_model() -> String {
    "0D".to_string()
}

fn default_stage1_bar() -> f64 {
    65.0
}

fn default_stage2_bar() -> f64 {
    85.0
}

/// Config with every variant token resolved to its typed selector.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTrain {
    pub name: String,
    pub has_bypass: bool,
    pub nf_model: NfModel,
    pub basis: Basis,
    pub desalination: Option<ResolvedDesalination>,
    pub posttreatment: PosttreatmentConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDesalination {
    pub two_stage: bool,
    pub ro_model: RoModel,
    pub stage1_pressure_bar: f64,
    pub stage2_pressure_bar: f64,
}

impl TrainConfig {
    pub fn from_yaml(text: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ConfigFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Parse every variant token, failing before any construction if one
    /// is not recognized.
    pub fn resolve(&self) -> AppResult<ResolvedTrain> {
        let nf_model: NfModel = self.pretreatment.nf_model.parse()?;
        let basis: Basis = self.pretreatment.basis.parse()?;
        let desalination = match &self.desalination {
            None => None,
            Some(d) => {
                if d.stage1_pressure_bar <= 1.0 || d.stage2_pressure_bar <= 1.0 {
                    return Err(AppError::InvalidInput(
                        "RO stage pressures must exceed 1 bar".to_string(),
                    ));
                }
                Some(ResolvedDesalination {
                    two_stage: d.two_stage,
                    ro_model: d.ro_model.parse()?,
                    stage1_pressure_bar: d.stage1_pressure_bar,
                    stage2_pressure_bar: d.stage2_pressure_bar,
                })
            }
        };
        Ok(ResolvedTrain {
            name: self.name.clone(),
            has_bypass: self.pretreatment.has_bypass,
            nf_model,
            basis,
            desalination,
            posttreatment: self.posttreatment.clone().unwrap_or_default(),
        })
    }
}
