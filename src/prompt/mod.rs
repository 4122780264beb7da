/// Fixed system instruction sent ahead of every user request.
///
/// The rules deliberately pin the model to a flat parametric-scripting subset:
/// no functions, no classes, exact attribute names per primitive, and a final
/// recompute so the document is in a consistent state before export.
pub fn system_instruction() -> &'static str {
    r#"You are an expert FreeCAD Python scripter.
Your task is to write a FLAT Python script (NO FUNCTIONS) to create the 3D object described.

CRITICAL SYNTAX RULES:
1. import FreeCAD, Part, Mesh
2. doc = FreeCAD.newDocument("Generated")
3. Use PARAMETRIC objects ONLY.
   - Correct: obj = doc.addObject("Part::Box", "MyBox")
   - Correct: obj = doc.addObject("Part::Cylinder", "MyCyl")

4. USE CORRECT ATTRIBUTES (DO NOT GUESS):
   - For Box: obj.Length, obj.Width, obj.Height
   - For Cylinder: obj.Radius, obj.Height (NOT Length!)
   - For Sphere: obj.Radius
   - For Cone: obj.Radius1, obj.Radius2, obj.Height

5. PLACEMENT logic:
   - To move up: obj.Placement.Base = FreeCAD.Vector(0,0,100)

6. ALWAYS end with: doc.recompute()
7. FORBIDDEN: Do NOT write 'def main():', do NOT use 'return', do NOT use 'if __name__'.
8. OUTPUT FORMAT: Write ONLY valid Python code. No English explanations."#
}

/// Build the full prompt for one request. The task is passed through
/// verbatim; it is opaque text as far as the pipeline is concerned.
pub fn build_prompt(task: &str) -> String {
    format!("{}\n\nUSER REQUEST: {}", system_instruction(), task)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_task_verbatim() {
        let p = build_prompt("a box 50x50x50 with a hole");
        assert!(p.contains("USER REQUEST: a box 50x50x50 with a hole"));
        assert!(p.starts_with(system_instruction()));
    }

    #[test]
    fn instruction_pins_the_scripting_subset() {
        let s = system_instruction();
        assert!(s.contains("doc.recompute()"));
        assert!(s.contains("Part::Box"));
        assert!(s.contains("FORBIDDEN"));
    }
}
