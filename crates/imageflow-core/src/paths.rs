//! Workflow template selection

use crate::flags::ImportFlags;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Template importing a disk file as-is (data disks)
pub const IMPORT_WORKFLOW: &str = "import_image.wf.json";

/// Template translating an existing image
pub const IMPORT_FROM_IMAGE_WORKFLOW: &str = "import_from_image.wf.json";

/// Template importing a disk file and translating it
pub const IMPORT_AND_TRANSLATE_WORKFLOW: &str = "import_and_translate.wf.json";

/// Translation workflow per supported `--os` value, relative to the
/// workflow directory
const TRANSLATE_WORKFLOWS: &[(&str, &str)] = &[
    ("centos-6", "enterprise_linux/translate_centos_6.wf.json"),
    ("centos-7", "enterprise_linux/translate_centos_7.wf.json"),
    ("debian-8", "debian/translate_debian_8.wf.json"),
    ("debian-9", "debian/translate_debian_9.wf.json"),
    ("rhel-6", "enterprise_linux/translate_rhel_6_licensed.wf.json"),
    ("rhel-6-byol", "enterprise_linux/translate_rhel_6_byol.wf.json"),
    ("rhel-7", "enterprise_linux/translate_rhel_7_licensed.wf.json"),
    ("rhel-7-byol", "enterprise_linux/translate_rhel_7_byol.wf.json"),
    ("ubuntu-1404", "ubuntu/translate_ubuntu_1404.wf.json"),
    ("ubuntu-1604", "ubuntu/translate_ubuntu_1604.wf.json"),
    ("windows-2008r2", "windows/translate_windows_2008_r2.wf.json"),
    ("windows-2012r2", "windows/translate_windows_2012_r2.wf.json"),
    ("windows-2016", "windows/translate_windows_2016.wf.json"),
    ("windows-7-byol", "windows/translate_windows_7_byol.wf.json"),
    ("windows-10-byol", "windows/translate_windows_10_byol.wf.json"),
];

/// Translation workflow for an OS identifier
pub fn translate_workflow_path(os: &str) -> Option<&'static str> {
    TRANSLATE_WORKFLOWS
        .iter()
        .find(|(id, _)| *id == os)
        .map(|(_, path)| *path)
}

/// All OS identifiers accepted by `--os`
pub fn supported_os() -> impl Iterator<Item = &'static str> {
    TRANSLATE_WORKFLOWS.iter().map(|(id, _)| *id)
}

/// Which top-level template an import runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    Import,
    ImportFromImage,
    ImportAndTranslate,
}

impl WorkflowKind {
    /// Template kind for already validated flags
    pub fn select(flags: &ImportFlags) -> Self {
        if flags.data_disk {
            WorkflowKind::Import
        } else if flags.source_image().is_some() {
            WorkflowKind::ImportFromImage
        } else {
            WorkflowKind::ImportAndTranslate
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            WorkflowKind::Import => IMPORT_WORKFLOW,
            WorkflowKind::ImportFromImage => IMPORT_FROM_IMAGE_WORKFLOW,
            WorkflowKind::ImportAndTranslate => IMPORT_AND_TRANSLATE_WORKFLOW,
        }
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowKind::Import => write!(f, "import"),
            WorkflowKind::ImportFromImage => write!(f, "import-from-image"),
            WorkflowKind::ImportAndTranslate => write!(f, "import-and-translate"),
        }
    }
}

/// Selected template and translation workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowPaths {
    pub kind: WorkflowKind,

    /// Template path inside the workflow directory
    pub workflow: PathBuf,

    /// Translation workflow, relative to the workflow directory.
    /// `None` for data disks, which are never translated.
    pub translate_workflow: Option<String>,
}

impl WorkflowPaths {
    /// Select the template for already validated flags.
    pub fn resolve(flags: &ImportFlags, workflow_dir: &Path) -> Self {
        let kind = WorkflowKind::select(flags);
        Self {
            kind,
            workflow: workflow_dir.join(kind.file_name()),
            translate_workflow: translate_workflow_for(flags).map(str::to_string),
        }
    }
}

/// Translation workflow for the flags; data disks are never translated
pub fn translate_workflow_for(flags: &ImportFlags) -> Option<&'static str> {
    if flags.data_disk {
        return None;
    }
    flags.os().and_then(translate_workflow_path)
}
