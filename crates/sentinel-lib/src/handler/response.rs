//! Response envelopes returned to the invoking platform

use super::event::InputShape;
use super::Outcome;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const CLOSE_DIALOG: &str = "Close";
const PLAIN_TEXT: &str = "PlainText";
const ERROR_PREFIX: &str = "Copilot: An error occurred:";

/// Response for direct invocations and HTTP gateways
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericResponse {
    pub status_code: u16,
    /// JSON document encoded as a string
    pub body: String,
}

impl GenericResponse {
    pub fn body_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// Dialog fulfillment state reported back to the conversational agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentState {
    Fulfilled,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogAction {
    #[serde(rename = "type")]
    pub action_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentState {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<Value>,
    pub state: FulfillmentState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub dialog_action: DialogAction,
    pub intent: IntentState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentMessage {
    pub content_type: String,
    pub content: String,
}

/// Conversational-agent response closing the dialog turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentResponse {
    pub session_state: SessionState,
    pub messages: Vec<FulfillmentMessage>,
}

impl FulfillmentResponse {
    pub fn state(&self) -> FulfillmentState {
        self.session_state.intent.state
    }

    /// Text of the first message, if any
    pub fn content(&self) -> Option<&str> {
        self.messages.first().map(|m| m.content.as_str())
    }
}

/// Handler response in one of the two wire shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HandlerResponse {
    Generic(GenericResponse),
    Fulfillment(FulfillmentResponse),
}

impl HandlerResponse {
    /// Convert a pipeline result into the envelope matching the input shape
    pub fn from_outcome(shape: &InputShape, result: &anyhow::Result<Outcome>) -> Self {
        match (shape, result) {
            (InputShape::Conversational { intent_name, slots }, Ok(outcome)) => {
                Self::fulfillment(
                    intent_name,
                    Some(slots.clone()),
                    FulfillmentState::Fulfilled,
                    outcome.notification.body.clone(),
                )
            }
            (InputShape::Conversational { intent_name, .. }, Err(err)) => Self::fulfillment(
                intent_name,
                None,
                FulfillmentState::Failed,
                format!("{} {}", ERROR_PREFIX, err),
            ),
            (_, Ok(outcome)) => HandlerResponse::Generic(GenericResponse {
                status_code: 200,
                body: json!({
                    "message": outcome.notification.body,
                    "prediction": outcome.classification,
                })
                .to_string(),
            }),
            (_, Err(err)) => HandlerResponse::Generic(GenericResponse {
                status_code: 500,
                body: json!({
                    "error": err.to_string(),
                    "trace": format!("{:?}", err),
                })
                .to_string(),
            }),
        }
    }

    fn fulfillment(
        intent_name: &str,
        slots: Option<Value>,
        state: FulfillmentState,
        content: String,
    ) -> Self {
        HandlerResponse::Fulfillment(FulfillmentResponse {
            session_state: SessionState {
                dialog_action: DialogAction {
                    action_type: CLOSE_DIALOG.to_string(),
                },
                intent: IntentState {
                    name: intent_name.to_string(),
                    slots,
                    state,
                },
            },
            messages: vec![FulfillmentMessage {
                content_type: PLAIN_TEXT.to_string(),
                content,
            }],
        })
    }

    pub fn as_generic(&self) -> Option<&GenericResponse> {
        match self {
            HandlerResponse::Generic(r) => Some(r),
            HandlerResponse::Fulfillment(_) => None,
        }
    }

    pub fn as_fulfillment(&self) -> Option<&FulfillmentResponse> {
        match self {
            HandlerResponse::Fulfillment(r) => Some(r),
            HandlerResponse::Generic(_) => None,
        }
    }
}
