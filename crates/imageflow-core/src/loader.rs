//! Workflow loader
//!
//! Reads a JSON workflow template and resolves its `IncludeWorkflow` steps
//! recursively, so the whole graph can be annotated in one pass.

use crate::error::{FlowError, Result};
use crate::model::{StepAction, Workflow};
use crate::vars::WorkflowVars;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, instrument};

const VAR_PATTERN: &str = r"\$\{([A-Za-z0-9_\-]+)\}";

/// Load the workflow at `path` and every workflow it includes.
///
/// `vars` bind the template's variables; declared defaults fill the rest.
#[instrument(skip(path, vars), fields(path = %path.display()))]
pub fn load_workflow(path: &Path, vars: &WorkflowVars) -> Result<Workflow> {
    let pattern = var_regex()?;
    let mut stack = Vec::new();
    let workflow = load_recursive(path, vars, pattern, &mut stack)?;
    info!(steps = workflow.steps.len(), "Loaded workflow");
    Ok(workflow)
}

fn var_regex() -> Result<&'static Regex> {
    static VAR: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    VAR.get_or_init(|| Regex::new(VAR_PATTERN))
        .as_ref()
        .map_err(|e| FlowError::Pattern(e.clone()))
}

/// Parse a workflow document; `path` only labels errors
pub fn parse_workflow(content: &str, path: &Path) -> Result<Workflow> {
    serde_json::from_str(content).map_err(|e| FlowError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn load_recursive(
    path: &Path,
    vars: &WorkflowVars,
    pattern: &Regex,
    stack: &mut Vec<PathBuf>,
) -> Result<Workflow> {
    let canonical = fs::canonicalize(path).map_err(|e| FlowError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if stack.contains(&canonical) {
        return Err(FlowError::IncludeCycle(canonical));
    }

    let content = fs::read_to_string(&canonical).map_err(|e| FlowError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut workflow = parse_workflow(&content, path)?;
    debug!(path = %path.display(), steps = workflow.steps.len(), "Parsed workflow file");

    let scope = effective_vars(&workflow, vars);
    let base_dir = canonical
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    stack.push(canonical);
    for (step_name, step) in workflow.steps.iter_mut() {
        let StepAction::IncludeWorkflow(include) = &mut step.action else {
            continue;
        };
        if include.workflow.is_some() {
            continue;
        }

        let relative = expand_strict(&include.path, &scope, pattern, path)?;
        let child_path = base_dir.join(&relative);
        debug!(step = %step_name, include = %child_path.display(), "Resolving include");

        let child_vars: WorkflowVars = include
            .vars
            .iter()
            .filter_map(|(name, value)| {
                value
                    .as_str()
                    .map(|v| (name.clone(), expand_lenient(v, &scope, pattern)))
            })
            .collect();
        let child = load_recursive(&child_path, &child_vars, pattern, stack)?;
        include.workflow = Some(Box::new(child));
    }
    stack.pop();

    Ok(workflow)
}

/// Declared defaults overlaid with the bound values
fn effective_vars(workflow: &Workflow, vars: &WorkflowVars) -> WorkflowVars {
    let mut scope: WorkflowVars = workflow
        .vars
        .keys()
        .filter_map(|name| {
            workflow
                .declared_var(name)
                .map(|value| (name.clone(), value.to_string()))
        })
        .collect();
    scope.extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
    scope
}

fn expand_strict(text: &str, scope: &WorkflowVars, pattern: &Regex, path: &Path) -> Result<String> {
    if let Some(missing) = pattern
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .find(|name| !scope.contains_key(name))
    {
        return Err(FlowError::UnknownVariable {
            name: missing,
            path: path.to_path_buf(),
        });
    }
    Ok(expand_lenient(text, scope, pattern))
}

/// Unbound references stay as written
fn expand_lenient(text: &str, scope: &WorkflowVars, pattern: &Regex) -> String {
    pattern
        .replace_all(text, |caps: &Captures| {
            scope
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::WorkflowAnnotator;
    use crate::labels::TMP_TYPE_LABEL;
    use std::fs;
    use tempfile::TempDir;

    const IMPORT_TEMPLATE: &str = r#"{
        "Name": "import-and-translate",
        "Vars": {
            "image_name": {"Required": true},
            "translate_workflow": {"Required": true}
        },
        "Steps": {
            "import": {
                "IncludeWorkflow": {"Path": "import_image.wf.json", "Vars": {"disk": "disk-${image_name}"}}
            },
            "translate": {
                "IncludeWorkflow": {"Path": "${translate_workflow}", "Vars": {"image_name": "${image_name}", "zone": "${ZONE}"}}
            }
        },
        "Dependencies": {"translate": ["import"]}
    }"#;

    const IMPORT_IMAGE: &str = r#"{
        "Name": "import-image",
        "Steps": {
            "setup-disks": {"CreateDisks": [{"Name": "${disk}"}]}
        }
    }"#;

    const TRANSLATE: &str = r#"{
        "Name": "translate-ubuntu",
        "Steps": {
            "translate-instance": {"CreateInstances": [{"Name": "inst-translate"}]},
            "create-image": {"CreateImages": [{"Name": "${image_name}"}]}
        }
    }"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn template_dir() -> (TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = write(temp_dir.path(), "import_and_translate.wf.json", IMPORT_TEMPLATE);
        write(temp_dir.path(), "import_image.wf.json", IMPORT_IMAGE);
        write(
            temp_dir.path(),
            "ubuntu/translate_ubuntu_1604.wf.json",
            TRANSLATE,
        );
        (temp_dir, root)
    }

    fn vars() -> WorkflowVars {
        WorkflowVars::from([
            ("image_name".to_string(), "my-image".to_string()),
            (
                "translate_workflow".to_string(),
                "ubuntu/translate_ubuntu_1604.wf.json".to_string(),
            ),
        ])
    }

    fn included<'a>(workflow: &'a Workflow, step: &str) -> &'a crate::model::IncludeWorkflow {
        match &workflow.steps[step].action {
            StepAction::IncludeWorkflow(include) => include,
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_load_resolves_includes() {
        let (_temp_dir, root) = template_dir();

        let workflow = load_workflow(&root, &vars()).unwrap();

        let translate = included(&workflow, "translate");
        assert_eq!(translate.path, "${translate_workflow}");
        let child = translate.workflow.as_deref().unwrap();
        assert_eq!(child.name, "translate-ubuntu");
        assert_eq!(child.steps.len(), 2);

        let import = included(&workflow, "import");
        assert_eq!(import.workflow.as_deref().unwrap().name, "import-image");
    }

    #[test]
    fn test_load_then_annotate_reaches_included_resources() {
        let (_temp_dir, root) = template_dir();
        let mut workflow = load_workflow(&root, &vars()).unwrap();

        let summary = WorkflowAnnotator::new("b1").annotate(&mut workflow);

        assert_eq!(summary.included_workflows, 2);
        assert_eq!(summary.disks, 1);
        assert_eq!(summary.instances, 1);
        assert_eq!(summary.images, 1);

        let child = included(&workflow, "import").workflow.as_deref().unwrap();
        let StepAction::CreateDisks(disks) = &child.steps["setup-disks"].action else {
            panic!("expected CreateDisks");
        };
        assert_eq!(disks[0].labels.as_ref().unwrap()[TMP_TYPE_LABEL], "true");
    }

    #[test]
    fn test_declared_default_is_used() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = write(
            temp_dir.path(),
            "outer.wf.json",
            r#"{
                "Vars": {"child": {"Value": "inner.wf.json"}},
                "Steps": {"inc": {"IncludeWorkflow": {"Path": "${child}"}}}
            }"#,
        );
        write(temp_dir.path(), "inner.wf.json", r#"{"Name": "inner", "Steps": {}}"#);

        let workflow = load_workflow(&root, &WorkflowVars::new()).unwrap();

        let child = included(&workflow, "inc").workflow.as_deref().unwrap();
        assert_eq!(child.name, "inner");
    }

    #[test]
    fn test_unknown_variable() {
        let (_temp_dir, root) = template_dir();
        let mut vars = vars();
        vars.remove("translate_workflow");

        let err = load_workflow(&root, &vars).unwrap_err();

        match err {
            FlowError::UnknownVariable { name, path } => {
                assert_eq!(name, "translate_workflow");
                assert_eq!(path, root);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_include_cycle() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = write(
            temp_dir.path(),
            "a.wf.json",
            r#"{"Steps": {"inc": {"IncludeWorkflow": {"Path": "b.wf.json"}}}}"#,
        );
        write(
            temp_dir.path(),
            "b.wf.json",
            r#"{"Steps": {"inc": {"IncludeWorkflow": {"Path": "a.wf.json"}}}}"#,
        );

        let err = load_workflow(&root, &WorkflowVars::new()).unwrap_err();

        assert!(matches!(err, FlowError::IncludeCycle(_)), "{:?}", err);
    }

    #[test]
    fn test_same_file_included_twice_is_not_a_cycle() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = write(
            temp_dir.path(),
            "outer.wf.json",
            r#"{"Steps": {
                "first": {"IncludeWorkflow": {"Path": "leaf.wf.json"}},
                "second": {"IncludeWorkflow": {"Path": "leaf.wf.json"}}
            }}"#,
        );
        write(temp_dir.path(), "leaf.wf.json", r#"{"Name": "leaf"}"#);

        let workflow = load_workflow(&root, &WorkflowVars::new()).unwrap();

        assert!(included(&workflow, "first").workflow.is_some());
        assert!(included(&workflow, "second").workflow.is_some());
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("absent.wf.json");

        let err = load_workflow(&path, &WorkflowVars::new()).unwrap_err();

        assert!(matches!(err, FlowError::IoError { .. }), "{:?}", err);
    }

    #[test]
    fn test_parse_error_names_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write(temp_dir.path(), "broken.wf.json", "{ not json");

        let err = load_workflow(&path, &WorkflowVars::new()).unwrap_err();

        match err {
            FlowError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_expand_lenient_keeps_unbound() {
        let pattern = var_regex().unwrap();
        let scope = WorkflowVars::from([("a".to_string(), "1".to_string())]);

        assert_eq!(expand_lenient("${a}-${b}", &scope, pattern), "1-${b}");
    }
}
