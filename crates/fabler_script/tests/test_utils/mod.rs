//! Test utilities for fabler_script tests.
//!
//! This module provides recording mocks for the engine's collaborators and
//! a helper that starts an engine over an in-memory script set.

#![allow(dead_code)]

use async_trait::async_trait;
use fabler_core::{ResponseCategory, StoryDetails, WaitCondition};
use fabler_error::{ActuatorError, FablerResult, PersonalizationError, PersonalizationErrorKind};
use fabler_interface::{Actuator, Personalization};
use fabler_script::{EngineSettingsBuilder, InMemoryScriptLoader, ScriptEngine, ScriptPaths};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One call made to the mock actuator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Robot { command: String, properties: String },
    RobotAndWait { command: String, properties: String },
    Opal { command: String, properties: Option<String> },
    Wait { kind: String },
}

impl Call {
    pub fn said(phrase: &str) -> Self {
        Call::Robot {
            command: "DO".to_string(),
            properties: phrase.to_string(),
        }
    }

    pub fn said_and_waited(phrase: &str) -> Self {
        Call::RobotAndWait {
            command: "DO".to_string(),
            properties: phrase.to_string(),
        }
    }

    pub fn opal(command: &str) -> Self {
        Call::Opal {
            command: command.to_string(),
            properties: None,
        }
    }
}

/// Actuator that records every call and replays scripted responses.
///
/// Once the scripted responses run out every wait times out.
#[derive(Debug, Clone, Default)]
pub struct MockActuator {
    calls: Arc<Mutex<Vec<Call>>>,
    responses: Arc<Mutex<VecDeque<Option<ResponseCategory>>>>,
    fail_robot: bool,
}

impl MockActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(self, responses: &[Option<ResponseCategory>]) -> Self {
        self.responses
            .lock()
            .expect("responses lock")
            .extend(responses.iter().copied());
        self
    }

    pub fn with_robot_failure(mut self) -> Self {
        self.fail_robot = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Properties of every LOAD_OBJECT call, parsed as JSON.
    pub fn loaded_objects(&self) -> Vec<serde_json::Value> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Opal {
                    command,
                    properties: Some(properties),
                } if command == "LOAD_OBJECT" => {
                    Some(serde_json::from_str(&properties).expect("LOAD_OBJECT payload is JSON"))
                }
                _ => None,
            })
            .collect()
    }

    pub fn opal_commands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Opal { command, .. } => Some(command),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl Actuator for MockActuator {
    async fn send_robot_command(&self, command: &str, properties: &str) -> FablerResult<()> {
        if self.fail_robot {
            return Err(ActuatorError::new("robot offline").into());
        }
        self.record(Call::Robot {
            command: command.to_string(),
            properties: properties.to_string(),
        });
        Ok(())
    }

    async fn send_robot_command_and_wait(
        &self,
        command: &str,
        _condition: WaitCondition,
        _timeout: Duration,
        properties: &str,
    ) -> FablerResult<()> {
        self.record(Call::RobotAndWait {
            command: command.to_string(),
            properties: properties.to_string(),
        });
        Ok(())
    }

    async fn send_opal_command(&self, command: &str, properties: Option<&str>) -> FablerResult<()> {
        self.record(Call::Opal {
            command: command.to_string(),
            properties: properties.map(str::to_string),
        });
        Ok(())
    }

    async fn wait_for_response(
        &self,
        kind: &str,
        timeout: Duration,
    ) -> FablerResult<Option<ResponseCategory>> {
        self.record(Call::Wait {
            kind: kind.to_string(),
        });
        let next = self.responses.lock().expect("responses lock").pop_front();
        match next {
            Some(response) => Ok(response),
            None => {
                tokio::time::sleep(timeout).await;
                Ok(Some(ResponseCategory::Timeout))
            }
        }
    }
}

/// Personalization that hands out a fixed list of stories.
#[derive(Debug, Clone)]
pub struct MockPersonalization {
    scripts: Arc<Mutex<VecDeque<String>>>,
    details: StoryDetails,
    requests: Arc<Mutex<usize>>,
}

impl MockPersonalization {
    pub fn new(scripts: &[&str], details: StoryDetails) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(scripts.iter().map(|s| s.to_string()).collect())),
            details,
            requests: Arc::new(Mutex::new(0)),
        }
    }

    pub fn single(script: &str) -> Self {
        Self::new(&[script], default_details())
    }

    pub fn script_requests(&self) -> usize {
        *self.requests.lock().expect("requests lock")
    }
}

#[async_trait]
impl Personalization for MockPersonalization {
    async fn next_story_script(&self) -> FablerResult<String> {
        *self.requests.lock().expect("requests lock") += 1;
        self.scripts
            .lock()
            .expect("scripts lock")
            .pop_front()
            .ok_or_else(|| {
                PersonalizationError::new(PersonalizationErrorKind::CatalogExhausted(0)).into()
            })
    }

    async fn next_story_details(&self) -> FablerResult<StoryDetails> {
        Ok(self.details.clone())
    }
}

pub fn default_details() -> StoryDetails {
    StoryDetails::new(
        vec!["forest".to_string(), "river".to_string(), "castle".to_string()],
        false,
        3,
    )
}

/// Start a seeded engine whose session script is `main.txt`.
pub async fn start_engine(
    loader: InMemoryScriptLoader,
    actuator: MockActuator,
    personalization: MockPersonalization,
) -> FablerResult<ScriptEngine<MockActuator, MockPersonalization>> {
    let settings = EngineSettingsBuilder::default()
        .seed(7u64)
        .build()
        .expect("Valid settings");
    ScriptEngine::builder()
        .actuator(actuator)
        .personalization(personalization)
        .loader(loader)
        .paths(ScriptPaths::default())
        .main_script("main.txt")
        .settings(settings)
        .start()
        .await
}
