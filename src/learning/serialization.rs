//! Export and import of trained agents
//!
//! Exports carry hyperparameters, statistics and the full table. Imports
//! accept partial hyperparameters, keeping the agent's current value for
//! anything left out, and are validated in full before anything changes.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ChaseError, Result};
use crate::learning::agent::{Hyperparameters, QLearningAgent, TrainingStats, REWARD_WINDOW};

/// Complete serializable agent state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentExport {
    pub hyperparameters: Hyperparameters,
    pub stats: TrainingStats,
    /// Sorted by key so exports are stable
    pub table: BTreeMap<String, Vec<f64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialHyperparameters {
    learning_rate: Option<f64>,
    gamma: Option<f64>,
    epsilon: Option<f64>,
    epsilon_decay: Option<f64>,
    epsilon_min: Option<f64>,
    num_actions: Option<usize>,
    init_noise: Option<f64>,
}

impl PartialHyperparameters {
    fn resolve(self, current: &Hyperparameters) -> Hyperparameters {
        Hyperparameters {
            learning_rate: self.learning_rate.unwrap_or(current.learning_rate),
            gamma: self.gamma.unwrap_or(current.gamma),
            epsilon: self.epsilon.unwrap_or(current.epsilon),
            epsilon_decay: self.epsilon_decay.unwrap_or(current.epsilon_decay),
            epsilon_min: self.epsilon_min.unwrap_or(current.epsilon_min),
            num_actions: self.num_actions.unwrap_or(current.num_actions),
            init_noise: self.init_noise.unwrap_or(current.init_noise),
        }
    }
}

impl From<Hyperparameters> for PartialHyperparameters {
    fn from(h: Hyperparameters) -> Self {
        Self {
            learning_rate: Some(h.learning_rate),
            gamma: Some(h.gamma),
            epsilon: Some(h.epsilon),
            epsilon_decay: Some(h.epsilon_decay),
            epsilon_min: Some(h.epsilon_min),
            num_actions: Some(h.num_actions),
            init_noise: Some(h.init_noise),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ImportPayload {
    #[serde(default)]
    hyperparameters: PartialHyperparameters,
    #[serde(default)]
    stats: Option<TrainingStats>,
    table: BTreeMap<String, Vec<f64>>,
}

impl From<AgentExport> for ImportPayload {
    fn from(export: AgentExport) -> Self {
        Self {
            hyperparameters: export.hyperparameters.into(),
            stats: Some(export.stats),
            table: export.table,
        }
    }
}

impl QLearningAgent {
    pub fn export(&self) -> AgentExport {
        AgentExport {
            hyperparameters: self.params.clone(),
            stats: self.stats.clone(),
            table: self
                .table
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    /// Replace this agent's state with `export`
    pub fn import(&mut self, export: AgentExport) -> Result<()> {
        self.apply_payload(export.into())
    }

    /// Replace this agent's state from JSON. On error nothing changes.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let payload: ImportPayload = serde_json::from_str(json).map_err(|e| {
            tracing::warn!("Rejected agent import: {}", e);
            ChaseError::from(e)
        })?;
        self.apply_payload(payload)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path.as_ref(), self.export_json()?)?;
        Ok(())
    }

    pub fn load_into(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let json = fs::read_to_string(path.as_ref())?;
        self.import_json(&json)
    }

    fn apply_payload(&mut self, payload: ImportPayload) -> Result<()> {
        let params = payload.hyperparameters.resolve(&self.params);
        params.validate().map_err(reject)?;

        for (key, row) in &payload.table {
            if row.len() != params.num_actions {
                return Err(reject(format!(
                    "row {:?} has {} values, expected {}",
                    key,
                    row.len(),
                    params.num_actions
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(reject(format!("row {:?} holds a non-finite value", key)));
            }
        }

        let stats = match payload.stats {
            Some(mut stats) => {
                if !stats.total_reward.is_finite() {
                    return Err(reject("total_reward is not finite".to_string()));
                }
                while stats.recent_rewards.len() > REWARD_WINDOW {
                    stats.recent_rewards.pop_front();
                }
                stats
            }
            None => self.stats.clone(),
        };

        self.params = params;
        self.stats = stats;
        self.table = payload.table.into_iter().collect();
        Ok(())
    }
}

fn reject(reason: String) -> ChaseError {
    tracing::warn!("Rejected agent import: {}", reason);
    ChaseError::ImportRejected(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::state::StateKey;

    fn trained() -> QLearningAgent {
        let mut agent = QLearningAgent::with_seed(Hyperparameters::default(), 7);
        let s = StateKey::from("g0|d2|hx|a0000");
        let t = StateKey::from("g1|d1|h3|a0100");
        agent.learn_key(&s, 0, 1.5, &t, false);
        agent.learn_key(&t, 3, -2.0, &s, true);
        agent.end_episode(-0.5);
        agent
    }

    #[test]
    fn test_json_roundtrip() {
        let agent = trained();
        let json = agent.export_json().expect("export");

        let mut fresh = QLearningAgent::with_seed(Hyperparameters::default(), 99);
        fresh.import_json(&json).expect("import");
        assert_eq!(fresh.export(), agent.export());
    }

    #[test]
    fn test_partial_hyperparameters_fall_back() {
        let mut agent = QLearningAgent::with_seed(Hyperparameters::default(), 1);
        agent
            .import_json(r#"{ "hyperparameters": { "gamma": 0.5 }, "table": {} }"#)
            .expect("partial payload");
        assert_eq!(agent.hyperparameters().gamma, 0.5);
        assert_eq!(agent.hyperparameters().learning_rate, 0.1);
        assert_eq!(agent.table_size(), 0);
    }

    #[test]
    fn test_malformed_json_leaves_agent_untouched() {
        let mut agent = trained();
        let before = agent.export();
        assert!(agent.import_json("{ not json").is_err());
        assert!(agent.import_json(r#"{ "hyperparameters": {} }"#).is_err());
        assert_eq!(agent.export(), before);
    }

    #[test]
    fn test_wrong_row_length_is_rejected() {
        let mut agent = trained();
        let before = agent.export();
        let result = agent.import_json(r#"{ "table": { "k": [1.0, 2.0] } }"#);
        assert!(matches!(result, Err(ChaseError::ImportRejected(_))));
        assert_eq!(agent.export(), before);
    }

    #[test]
    fn test_invalid_hyperparameters_are_rejected() {
        let mut agent = trained();
        let before = agent.export();
        let result = agent.import_json(r#"{ "hyperparameters": { "learning_rate": 3.0 }, "table": {} }"#);
        assert!(matches!(result, Err(ChaseError::ImportRejected(_))));
        assert_eq!(agent.export(), before);
    }
}
