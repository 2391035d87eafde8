#![forbid(unsafe_code)]

//! Form-class expansion
//!
//! Form classes are named sets of form types. A member prefixed with `@`
//! refers to another class, so declarations form a graph that must be
//! acyclic. [`FormClassGraph::validate`] checks the whole graph once;
//! [`FormClassGraph::expand`] then flattens a row's form list, skipping any
//! class already visited during that expansion.

use crate::diagnostics::{DiagnosticSink, LOAD_DEI_VALIDATIONS};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Prefix marking a reference to another form class
pub const CLASS_REF_MARKER: char = '@';

/// Form token matching every form type
pub const ALL_FORMS: &str = "*";

/// A form list as written in the catalog: a string or nested lists of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormList {
    One(String),
    Many(Vec<FormList>),
}

impl FormList {
    /// Flattens nested lists into the sequence of tokens
    pub fn flatten(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FormList::One(s) => out.push(s),
            FormList::Many(items) => {
                for item in items {
                    item.collect_into(out);
                }
            }
        }
    }
}

/// Resolved set of forms a row applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSet {
    /// The wildcard form was present; applies to every form type
    All,
    Forms(BTreeSet<String>),
}

impl FormSet {
    pub fn contains(&self, form_type: &str) -> bool {
        match self {
            FormSet::All => true,
            FormSet::Forms(forms) => forms.contains(form_type),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FormSet::Forms(forms) if forms.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    OnPath,
    Done,
}

/// Adjacency view over declared form classes
#[derive(Debug, Clone, Copy)]
pub struct FormClassGraph<'a> {
    classes: &'a BTreeMap<String, FormList>,
}

impl<'a> FormClassGraph<'a> {
    pub fn new(classes: &'a BTreeMap<String, FormList>) -> Self {
        FormClassGraph { classes }
    }

    /// Reports undeclared references inside class bodies and every cycle
    ///
    /// Each back edge is reported exactly once, naming the class closing the
    /// cycle and the chain of classes leading to it.
    pub fn validate(&self, sink: &dyn DiagnosticSink) {
        let mut marks: HashMap<&str, Mark> = HashMap::new();
        let mut path: Vec<&str> = Vec::new();
        for name in self.classes.keys() {
            if !marks.contains_key(name.as_str()) {
                self.visit(name, &mut marks, &mut path, sink);
            }
        }
    }

    fn visit(
        &self,
        name: &'a str,
        marks: &mut HashMap<&'a str, Mark>,
        path: &mut Vec<&'a str>,
        sink: &dyn DiagnosticSink,
    ) {
        marks.insert(name, Mark::OnPath);
        path.push(name);

        if let Some(body) = self.classes.get(name) {
            for form in body.flatten() {
                let Some(target) = form.strip_prefix(CLASS_REF_MARKER) else {
                    continue;
                };
                let Some((declared, _)) = self.classes.get_key_value(target) else {
                    report_missing(form, Some(name), sink);
                    continue;
                };
                match marks.get(target) {
                    Some(Mark::OnPath) => {
                        let mut chain = path.clone();
                        chain.push(target);
                        sink.error(
                            LOAD_DEI_VALIDATIONS,
                            &format!(
                                "Circular reference to {} in {}.",
                                target,
                                chain.join(" -> ")
                            ),
                            &[
                                ("formClass", target.to_string()),
                                ("formClasses", chain.join(" -> ")),
                            ],
                        );
                    }
                    Some(Mark::Done) => {}
                    None => self.visit(declared, marks, path, sink),
                }
            }
        }

        path.pop();
        marks.insert(name, Mark::Done);
    }

    /// Expands a row's form tokens into a flat form set
    ///
    /// Undeclared classes named directly by the row are reported and
    /// contribute nothing; classes are expanded at most once per call, so a
    /// cyclic declaration terminates.
    pub fn expand<S: AsRef<str>>(&self, forms: &[S], sink: &dyn DiagnosticSink) -> FormSet {
        let mut out = BTreeSet::new();
        let mut visited: HashSet<&str> = HashSet::new();
        for form in forms {
            self.expand_token(form.as_ref(), true, &mut out, &mut visited, sink);
        }
        if out.contains(ALL_FORMS) {
            FormSet::All
        } else {
            FormSet::Forms(out)
        }
    }

    fn expand_token(
        &self,
        form: &str,
        top_level: bool,
        out: &mut BTreeSet<String>,
        visited: &mut HashSet<&'a str>,
        sink: &dyn DiagnosticSink,
    ) {
        let Some(target) = form.strip_prefix(CLASS_REF_MARKER) else {
            out.insert(form.to_string());
            return;
        };
        let Some((declared, body)) = self.classes.get_key_value(target) else {
            // Undeclared references inside class bodies are reported by validate()
            if top_level {
                report_missing(form, None, sink);
            }
            return;
        };
        if !visited.insert(declared.as_str()) {
            return;
        }
        for nested in body.flatten() {
            self.expand_token(nested, false, out, visited, sink);
        }
    }
}

fn report_missing(reference: &str, in_class: Option<&str>, sink: &dyn DiagnosticSink) {
    let mut context = vec![("referencedClass", reference.to_string())];
    if let Some(class) = in_class {
        context.push(("formClass", class.to_string()));
    }
    sink.error(
        LOAD_DEI_VALIDATIONS,
        &format!("Missing declaration for {}.", reference),
        &context,
    );
}
