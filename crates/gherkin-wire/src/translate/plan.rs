//! Resolved translation plans.

use gherkin_wire_harness::Runner;

use crate::program::ScenarioProgram;
use crate::resolver::Anomaly;

/// One node of a [`Plan`], mirroring the runner registration it becomes.
#[derive(Debug, Clone)]
pub enum PlanNode {
    /// A feature or rule, registered with `describe`.
    Group {
        /// Group name.
        name: String,
        /// Backgrounds, nested groups and tests in document order.
        children: Vec<PlanNode>,
    },
    /// A background, registered with `before_each`.
    Background(ScenarioProgram),
    /// A concrete scenario, registered with `test`.
    Test(ScenarioProgram),
}

/// An anomaly together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "diagnostics", derive(serde::Serialize))]
pub struct PlanAnomaly {
    /// Enclosing group names followed by the program name.
    pub path: Vec<String>,
    /// What was found.
    pub anomaly: Anomaly,
}

/// Fully resolved registrations for a document.
///
/// A plan can be inspected before installing it and installed onto any
/// number of runners.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    nodes: Vec<PlanNode>,
}

impl Plan {
    pub(crate) fn new(nodes: Vec<PlanNode>) -> Self {
        Self { nodes }
    }

    /// Top-level nodes, one group per feature.
    #[must_use]
    pub fn nodes(&self) -> &[PlanNode] {
        &self.nodes
    }

    /// Number of tests the plan registers.
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.programs()
            .filter(|(_, node)| matches!(node, PlanNode::Test(_)))
            .count()
    }

    /// Every anomaly found while resolving, in document order.
    #[must_use]
    pub fn anomalies(&self) -> Vec<PlanAnomaly> {
        self.programs()
            .filter_map(|(path, node)| match node {
                PlanNode::Background(program) | PlanNode::Test(program) => {
                    Some((path, program))
                }
                PlanNode::Group { .. } => None,
            })
            .flat_map(|(path, program)| {
                let mut full = path;
                if !program.name().is_empty() {
                    full.push(program.name().to_owned());
                }
                program
                    .steps()
                    .iter()
                    .filter_map(|step| step.anomaly().cloned())
                    .map(move |anomaly| PlanAnomaly {
                        path: full.clone(),
                        anomaly,
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Register every node with `runner` in document order.
    pub fn install(&self, runner: &mut dyn Runner) {
        install_nodes(&self.nodes, runner);
    }

    /// Backgrounds and tests paired with the names of their enclosing groups.
    fn programs(&self) -> impl Iterator<Item = (Vec<String>, &PlanNode)> {
        let mut out = Vec::new();
        collect_programs(&self.nodes, &mut Vec::new(), &mut out);
        out.into_iter()
    }
}

fn collect_programs<'a>(
    nodes: &'a [PlanNode],
    path: &mut Vec<String>,
    out: &mut Vec<(Vec<String>, &'a PlanNode)>,
) {
    for node in nodes {
        match node {
            PlanNode::Group { name, children } => {
                path.push(name.clone());
                collect_programs(children, path, out);
                path.pop();
            }
            PlanNode::Background(_) | PlanNode::Test(_) => out.push((path.clone(), node)),
        }
    }
}

fn install_nodes(nodes: &[PlanNode], runner: &mut dyn Runner) {
    for node in nodes {
        match node {
            PlanNode::Group { name, children } => {
                runner.describe(name, &mut |group| install_nodes(children, group));
            }
            PlanNode::Background(program) => {
                runner.before_each(program.clone().into_test_body());
            }
            PlanNode::Test(program) => {
                runner.test(program.name(), program.clone().into_test_body());
            }
        }
    }
}

#[cfg(feature = "diagnostics")]
mod summary {
    use serde::Serialize;

    use super::{Plan, PlanNode};
    use crate::keyword::StepKeyword;
    use crate::program::{ProgramKind, ScenarioProgram};
    use crate::resolver::{Anomaly, ResolvedStep};

    /// Serializable view of a [`Plan`].
    #[derive(Debug, Clone, Serialize)]
    pub struct PlanSummary {
        /// Top-level nodes, one per feature.
        pub features: Vec<SummaryNode>,
        /// Number of tests the plan registers.
        pub tests: usize,
        /// Steps without a handler, anomalies included.
        pub unresolved: usize,
    }

    /// Serializable view of a [`PlanNode`].
    #[derive(Debug, Clone, Serialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    pub enum SummaryNode {
        /// A feature or rule.
        Group {
            /// Group name.
            name: String,
            /// Nested nodes.
            children: Vec<SummaryNode>,
        },
        /// A background or test.
        Program(ProgramSummary),
    }

    /// Serializable view of a [`ScenarioProgram`].
    #[derive(Debug, Clone, Serialize)]
    pub struct ProgramSummary {
        /// Background or scenario.
        pub kind: ProgramKind,
        /// Program name.
        pub name: String,
        /// Fixtures requested from the runner.
        pub fixtures: Vec<String>,
        /// Steps in execution order.
        pub steps: Vec<StepSummary>,
    }

    /// Serializable view of a [`ResolvedStep`].
    #[derive(Debug, Clone, Serialize)]
    pub struct StepSummary {
        /// Literal keyword and text.
        pub label: String,
        /// Keyword used for lookup.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub keyword: Option<StepKeyword>,
        /// Pattern of the matched handler.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub pattern: Option<String>,
        /// Definition site of the matched handler.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub location: Option<String>,
        /// Values captured by the pattern.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        pub captures: Vec<String>,
        /// Structural problem found during resolution.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub anomaly: Option<Anomaly>,
    }

    impl From<&ResolvedStep> for StepSummary {
        fn from(step: &ResolvedStep) -> Self {
            let handler = step.handler();
            Self {
                label: step.step().label(),
                keyword: step.keyword(),
                pattern: handler.map(|h| h.handler().pattern().as_str().to_owned()),
                location: handler.and_then(|h| h.handler().location().map(str::to_owned)),
                captures: handler.map(|h| h.captures().to_vec()).unwrap_or_default(),
                anomaly: step.anomaly().cloned(),
            }
        }
    }

    impl From<&ScenarioProgram> for ProgramSummary {
        fn from(program: &ScenarioProgram) -> Self {
            Self {
                kind: program.kind(),
                name: program.name().to_owned(),
                fixtures: program.fixtures().names().map(str::to_owned).collect(),
                steps: program.steps().iter().map(StepSummary::from).collect(),
            }
        }
    }

    impl From<&PlanNode> for SummaryNode {
        fn from(node: &PlanNode) -> Self {
            match node {
                PlanNode::Group { name, children } => Self::Group {
                    name: name.clone(),
                    children: children.iter().map(Self::from).collect(),
                },
                PlanNode::Background(program) | PlanNode::Test(program) => {
                    Self::Program(program.into())
                }
            }
        }
    }

    impl Plan {
        /// Serializable summary for tooling.
        #[must_use]
        pub fn summary(&self) -> PlanSummary {
            let unresolved = self
                .programs()
                .filter_map(|(_, node)| match node {
                    PlanNode::Background(program) | PlanNode::Test(program) => Some(program),
                    PlanNode::Group { .. } => None,
                })
                .flat_map(ScenarioProgram::steps)
                .filter(|step| !step.is_resolved())
                .count();
            PlanSummary {
                features: self.nodes().iter().map(SummaryNode::from).collect(),
                tests: self.test_count(),
                unresolved,
            }
        }

        /// The summary rendered as JSON.
        ///
        /// # Errors
        ///
        /// Returns the `serde_json` error if serialization fails.
        pub fn to_json(&self) -> serde_json::Result<String> {
            serde_json::to_string_pretty(&self.summary())
        }
    }
}

#[cfg(feature = "diagnostics")]
pub use summary::{PlanSummary, ProgramSummary, StepSummary, SummaryNode};
