use serde::{Deserialize, Serialize};

/// Event consumed by the runner: one organization, an ordered batch of commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub org: String,
    #[serde(default)]
    pub cmds: Vec<CommandSpec>,
}

/// Argument vector forwarded verbatim to the external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn command_line(&self) -> String {
        command_line(&self.args)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub cmd: String,
    pub success: bool,
    pub output: String,
}

/// One result per command spec, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub results: Vec<CommandResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingResponse {
    pub clients: Vec<String>,
}

/// Display form of an argument vector: every argument followed by one space.
pub fn command_line(args: &[String]) -> String {
    let mut line = String::with_capacity(args.iter().map(|a| a.len() + 1).sum());
    for arg in args {
        line.push_str(arg);
        line.push(' ');
    }
    line
}
