use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCall {
    pub name: String,
    pub args: Vec<String>, // never populated; `name(args)` stays whole in `name`
}

impl FilterCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

/// `{{ base | filter | ... }}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub base: String,             // e.g., "user.name"
    pub filters: Vec<FilterCall>, // source order
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Node {
    Text(String),
    Variable(Variable),
    Conditional {
        condition: String, // opaque, passed through
        body: Vec<Node>,
        else_body: Vec<Node>,
    },
    Iteration {
        item: String, // e.g., "message"
        list: String, // e.g., "messages"
        body: Vec<Node>,
    },
    Assignment {
        name: String,
        value: String, // opaque
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Root {
    pub children: Vec<Node>,
}
