use std::path::Path;

/// Printed by the epilogue when both exports land. The only trusted success
/// signal in the whole pipeline.
pub const SUCCESS_MARKER: &str = "SUCCESS";

/// Printed when the script ran but left the document empty.
pub const NO_OBJECTS_MARKER: &str = "ERROR: No objects created";

/// Prefix of the line the epilogue prints when export raises.
pub const EXPORT_ERROR_PREFIX: &str = "Export Error:";

/// Written unconditionally so the fragment can never fail on a missing name.
const FORCED_IMPORTS: &str = "import FreeCAD, Part, Mesh\nimport FreeCAD as App\n";

/// Wrap a sanitized fragment into a runnable engine script: forced imports,
/// the fragment verbatim, then the export/reporting epilogue.
///
/// Fragment lines restating the FreeCAD import are elided; the header above
/// is authoritative and the target interpreter must never see a duplicate.
pub fn assemble(fragment: &str, step_path: &Path, stl_path: &Path) -> String {
    let mut script = String::with_capacity(fragment.len() + 512);
    script.push_str(FORCED_IMPORTS);
    script.push('\n');

    for line in fragment.lines() {
        if line.contains("import FreeCAD") {
            continue;
        }
        script.push_str(line);
        script.push('\n');
    }

    script.push_str(&epilogue(step_path, stl_path));
    script
}

/// Export epilogue. Everything runs inside one try/except so an export
/// failure becomes a parseable diagnostic line on stdout instead of a bare
/// non-zero exit.
fn epilogue(step_path: &Path, stl_path: &Path) -> String {
    format!(
        r#"

# --- EXPORT LOGIC ---
try:
    objs = App.ActiveDocument.Objects
    if len(objs) > 0:
        Part.export(objs, r'{step}')
        Mesh.export(objs, r'{stl}')
        print('{success}')
    else:
        print('{no_objects}')
except Exception as e:
    print(f'{prefix} {{e}}')
"#,
        step = step_path.display(),
        stl = stl_path.display(),
        success = SUCCESS_MARKER,
        no_objects = NO_OBJECTS_MARKER,
        prefix = EXPORT_ERROR_PREFIX,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn paths() -> (PathBuf, PathBuf) {
        (
            PathBuf::from("/tmp/run/model.step"),
            PathBuf::from("/tmp/run/model.stl"),
        )
    }

    #[test]
    fn forced_import_is_never_duplicated() {
        let (step, stl) = paths();
        let fragment = "import FreeCAD, Part, Mesh\nimport FreeCAD as App\ndoc = FreeCAD.newDocument(\"G\")\ndoc.recompute()";
        let script = assemble(fragment, &step, &stl);
        assert_eq!(script.matches("import FreeCAD, Part, Mesh").count(), 1);
        assert_eq!(script.matches("import FreeCAD as App").count(), 1);
    }

    #[test]
    fn fragment_lines_are_copied_verbatim() {
        let (step, stl) = paths();
        let fragment = "doc = FreeCAD.newDocument(\"G\")\nobj = doc.addObject(\"Part::Box\", \"B\")\nobj.Length = 50";
        let script = assemble(fragment, &step, &stl);
        for line in fragment.lines() {
            assert!(script.contains(line));
        }
    }

    #[test]
    fn epilogue_carries_markers_and_export_paths() {
        let (step, stl) = paths();
        let script = assemble("doc.recompute()", &step, &stl);
        assert!(script.contains("Part.export(objs, r'/tmp/run/model.step')"));
        assert!(script.contains("Mesh.export(objs, r'/tmp/run/model.stl')"));
        assert!(script.contains(&format!("print('{}')", SUCCESS_MARKER)));
        assert!(script.contains(&format!("print('{}')", NO_OBJECTS_MARKER)));
        assert!(script.contains(EXPORT_ERROR_PREFIX));
    }

    #[test]
    fn export_error_line_is_a_python_fstring() {
        let (step, stl) = paths();
        let script = assemble("", &step, &stl);
        assert!(script.contains("print(f'Export Error: {e}')"));
    }
}
