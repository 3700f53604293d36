//! Scenario definitions and the built-in scenarios
//!
//! A scenario is an ordered list of steps run against one memory service
//! session. Scenarios can be written in RON:
//!
//! ```ron
//! Scenario(
//!     name: "contact",
//!     description: "Store an email preference and query it",
//!     steps: [
//!         CheckHealth,
//!         AddTurns(
//!             turns: [(kind: Human, text: "Email me at test@example.com")],
//!         ),
//!         Pause(millis: 2000),
//!         Retrieve(query: "contact preferences"),
//!     ],
//! )
//! ```

use crate::error::{Error, Result};
use memprobe_core::TurnKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const COMPREHENSIVE: &str = "comprehensive";
pub const EVOLUTION: &str = "evolution";

/// An ordered probe script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<Step>,
}

/// One action of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    /// Require a 200 `{"status": "healthy"}`; failure aborts the scenario
    CheckHealth,
    /// Post turns in order, timestamped at send time
    AddTurns {
        /// Post into `{conversation_id}_{suffix}` instead of the main conversation
        #[serde(default)]
        conversation_suffix: Option<String>,
        turns: Vec<TurnScript>,
        /// Stop at the first rejected turn
        #[serde(default = "default_strict")]
        strict: bool,
        /// Only print rejections, no banner or progress lines
        #[serde(default)]
        quiet: bool,
    },
    /// Query memories and print the ranked result
    Retrieve { query: String },
    /// Sleep, scaled by the run's wait scale
    Pause {
        millis: u64,
        #[serde(default)]
        note: Option<String>,
    },
    /// Print a line to the transcript
    Heading(String),
}

fn default_strict() -> bool {
    true
}

/// A turn before it is bound to a session and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnScript {
    pub kind: TurnKind,
    pub text: String,
}

impl TurnScript {
    pub fn human(text: impl Into<String>) -> Self {
        Self {
            kind: TurnKind::Human,
            text: text.into(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            kind: TurnKind::Ai,
            text: text.into(),
        }
    }
}

impl Step {
    /// Short human-readable label used in reports and logs
    pub fn label(&self) -> String {
        match self {
            Step::CheckHealth => "check health".to_string(),
            Step::AddTurns {
                conversation_suffix,
                turns,
                ..
            } => match conversation_suffix {
                Some(suffix) => format!("add {} turn(s) to _{}", turns.len(), suffix),
                None => format!("add {} turn(s)", turns.len()),
            },
            Step::Retrieve { query } => format!("retrieve '{}'", query),
            Step::Pause { millis, .. } => format!("pause {}ms", millis),
            Step::Heading(text) => format!("heading '{}'", text.trim()),
        }
    }
}

impl Scenario {
    /// Load a scenario from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_ron(&content)
    }

    /// Parse a scenario from RON text
    pub fn from_ron(content: &str) -> Result<Self> {
        let scenario: Scenario =
            ron::from_str(content).map_err(|e| Error::Parse(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Pretty RON rendering, suitable as a template for custom scenarios
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
            .map_err(|e| Error::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("scenario name must not be empty".to_string()));
        }
        if self.steps.is_empty() {
            return Err(Error::Validation(format!("scenario '{}' has no steps", self.name)));
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::AddTurns { turns, .. } if turns.is_empty() => {
                    return Err(Error::Validation(format!(
                        "step {} of '{}' adds no turns",
                        i + 1,
                        self.name
                    )));
                }
                Step::Retrieve { query } if query.trim().is_empty() => {
                    return Err(Error::Validation(format!(
                        "step {} of '{}' has an empty query",
                        i + 1,
                        self.name
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Names accepted by [`Scenario::builtin`]
    pub fn builtin_names() -> &'static [&'static str] {
        &[COMPREHENSIVE, EVOLUTION]
    }

    /// Look up a built-in scenario by name
    pub fn builtin(name: &str) -> Result<Self> {
        match name {
            COMPREHENSIVE => Ok(Self::comprehensive()),
            EVOLUTION => Ok(Self::evolution()),
            other => Err(Error::UnknownScenario(other.to_string())),
        }
    }

    /// Health check, a six-turn project conversation, then five retrievals
    pub fn comprehensive() -> Self {
        let mut steps = vec![
            Step::CheckHealth,
            Step::AddTurns {
                conversation_suffix: None,
                turns: project_conversation(),
                strict: true,
                quiet: false,
            },
            Step::Pause {
                millis: 3000,
                note: Some("Waiting for memory processing to complete...".to_string()),
            },
        ];

        for query in [
            "project preferences",
            "tech stack",
            "email contact",
            "MongoDB Atlas",
            "AWS deployment",
        ] {
            steps.push(Step::Retrieve {
                query: query.to_string(),
            });
            steps.push(Step::Pause {
                millis: 1000,
                note: None,
            });
        }

        steps.push(Step::Heading("=== All Tests Completed ===".to_string()));

        Self {
            name: COMPREHENSIVE.to_string(),
            description: "Store a project-preferences conversation and query it from several angles"
                .to_string(),
            steps,
        }
    }

    /// Repeat a contact preference and watch how retrieval changes
    pub fn evolution() -> Self {
        let suffix = Some(EVOLUTION.to_string());

        Self {
            name: EVOLUTION.to_string(),
            description: "Reinforce a repeated fact and compare retrievals before and after"
                .to_string(),
            steps: vec![
                Step::Heading("=== Testing Memory Evolution ===".to_string()),
                Step::AddTurns {
                    conversation_suffix: suffix.clone(),
                    turns: vec![
                        TurnScript::human("I prefer to be contacted via email at test@example.com"),
                        TurnScript::ai(
                            "I've noted your preference for email communication at test@example.com",
                        ),
                    ],
                    strict: false,
                    quiet: true,
                },
                Step::Heading("Initial memory state:".to_string()),
                Step::Retrieve {
                    query: "contact preferences".to_string(),
                },
                Step::Pause {
                    millis: 2000,
                    note: None,
                },
                Step::AddTurns {
                    conversation_suffix: suffix,
                    turns: vec![TurnScript::human(
                        "Just to confirm, my email is test@example.com and I prefer email over phone calls",
                    )],
                    strict: false,
                    quiet: true,
                },
                Step::Pause {
                    millis: 2000,
                    note: None,
                },
                Step::Heading("Memory state after reinforcement:".to_string()),
                Step::Retrieve {
                    query: "contact preferences".to_string(),
                },
            ],
        }
    }
}

fn project_conversation() -> Vec<TurnScript> {
    vec![
        TurnScript::human("Hello! I'd like to discuss my preferences for a new project."),
        TurnScript::ai(
            "I'd be happy to discuss your project preferences. What type of project are you working on?",
        ),
        TurnScript::human(
            "I'm building a data analytics platform. I prefer Python for backend and React for frontend. \
             Also, I'd like to use MongoDB Atlas for storage with vector search capabilities.",
        ),
        TurnScript::ai(
            "Great choices! Python works well for data analytics backends, and React offers a flexible \
             frontend. MongoDB Atlas with vector search is excellent for handling both structured data \
             and vector embeddings. Would you like some architecture recommendations?",
        ),
        TurnScript::human(
            "Yes, please. I'd also like to deploy this on AWS and integrate with their machine learning \
             services. My email is test@example.com if you need to send me any documentation.",
        ),
        TurnScript::ai(
            "Ok. Thanks for the input. I'll send you the documentation to your email. For AWS deployment, \
             I recommend using EC2 for compute resources and S3 for storage. You can also leverage AWS \
             Lambda for serverless functions. Would you like to discuss any specific AWS services?",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_valid() {
        for name in Scenario::builtin_names() {
            let scenario = Scenario::builtin(name).unwrap();
            assert_eq!(scenario.name, *name);
            scenario.validate().unwrap();
        }
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(matches!(
            Scenario::builtin("soak"),
            Err(Error::UnknownScenario(name)) if name == "soak"
        ));
    }

    #[test]
    fn test_comprehensive_shape() {
        let scenario = Scenario::comprehensive();
        assert_eq!(scenario.steps[0], Step::CheckHealth);

        match &scenario.steps[1] {
            Step::AddTurns { turns, strict, conversation_suffix, quiet } => {
                assert!(!quiet);
                assert_eq!(turns.len(), 6);
                assert!(*strict);
                assert!(conversation_suffix.is_none());
                let kinds: Vec<TurnKind> = turns.iter().map(|t| t.kind).collect();
                assert_eq!(
                    kinds,
                    vec![
                        TurnKind::Human,
                        TurnKind::Ai,
                        TurnKind::Human,
                        TurnKind::Ai,
                        TurnKind::Human,
                        TurnKind::Ai
                    ]
                );
            }
            other => panic!("unexpected step {:?}", other),
        }

        let queries: Vec<&str> = scenario
            .steps
            .iter()
            .filter_map(|s| match s {
                Step::Retrieve { query } => Some(query.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            queries,
            vec![
                "project preferences",
                "tech stack",
                "email contact",
                "MongoDB Atlas",
                "AWS deployment"
            ]
        );
    }

    #[test]
    fn test_turn_text_has_no_continuation_whitespace() {
        for turn in project_conversation() {
            assert!(!turn.text.contains("  "), "double space in {:?}", turn.text);
        }
    }

    #[test]
    fn test_evolution_uses_side_conversation() {
        let scenario = Scenario::evolution();
        let adds: Vec<&Step> = scenario
            .steps
            .iter()
            .filter(|s| matches!(s, Step::AddTurns { .. }))
            .collect();
        assert_eq!(adds.len(), 2);
        for step in adds {
            if let Step::AddTurns { conversation_suffix, strict, quiet, .. } = step {
                assert_eq!(conversation_suffix.as_deref(), Some("evolution"));
                assert!(!strict);
                assert!(quiet);
            }
        }
    }

    #[test]
    fn test_parse_custom_scenario_with_defaults() {
        let scenario = Scenario::from_ron(
            r#"Scenario(
                name: "contact",
                steps: [
                    CheckHealth,
                    AddTurns(turns: [(kind: Human, text: "Email me at test@example.com")]),
                    Pause(millis: 500),
                    Retrieve(query: "contact preferences"),
                    Heading("done"),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(scenario.description, "");
        assert_eq!(scenario.steps.len(), 5);
        assert_eq!(
            scenario.steps[1],
            Step::AddTurns {
                conversation_suffix: None,
                turns: vec![TurnScript::human("Email me at test@example.com")],
                strict: true,
                quiet: false,
            }
        );
        assert_eq!(
            scenario.steps[2],
            Step::Pause {
                millis: 500,
                note: None
            }
        );
    }

    #[test]
    fn test_builtin_template_parses_back() {
        let original = Scenario::evolution();
        let text = original.to_ron().unwrap();
        assert_eq!(Scenario::from_ron(&text).unwrap(), original);
    }

    #[test]
    fn test_validation_errors() {
        let empty = Scenario {
            name: "empty".to_string(),
            description: String::new(),
            steps: vec![],
        };
        assert!(matches!(empty.validate(), Err(Error::Validation(_))));

        let no_turns = Scenario {
            name: "no-turns".to_string(),
            description: String::new(),
            steps: vec![Step::AddTurns {
                conversation_suffix: None,
                turns: vec![],
                strict: true,
                quiet: false,
            }],
        };
        assert!(matches!(no_turns.validate(), Err(Error::Validation(_))));

        let blank_query = Scenario {
            name: "blank".to_string(),
            description: String::new(),
            steps: vec![Step::Retrieve {
                query: "  ".to_string(),
            }],
        };
        assert!(matches!(blank_query.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Step::CheckHealth.label(), "check health");
        assert_eq!(
            Step::Retrieve {
                query: "tech stack".to_string()
            }
            .label(),
            "retrieve 'tech stack'"
        );
        assert_eq!(
            Scenario::evolution().steps[1].label(),
            "add 2 turn(s) to _evolution"
        );
    }
}
