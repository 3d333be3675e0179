//! Material rules over the shader analysis.

use assetforge_spec::finding::{Category, Finding, Severity};

use super::{RuleContext, ValidationRule};

/// Returns all material rules.
pub fn all_rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(MissingMaterialRule),
        Box::new(UnsupportedShaderRule),
        Box::new(MalformedGraphRule),
        Box::new(ComplexInputRule),
    ]
}

pub struct MissingMaterialRule;

impl ValidationRule for MissingMaterialRule {
    fn id(&self) -> &'static str {
        "material/missing-material"
    }

    fn category(&self) -> Category {
        Category::Material
    }

    fn description(&self) -> &'static str {
        "Object has no material assigned"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        if ctx.mesh.is_none() || !ctx.materials.is_empty() {
            return vec![];
        }
        vec![self
            .finding("object has no material assigned", &ctx.asset.name)
            .with_suggestion("Assign a material so the importer can create an instance")]
    }
}

/// Whole-material Complex classification: one finding per material, no
/// per-input findings.
pub struct UnsupportedShaderRule;

impl ValidationRule for UnsupportedShaderRule {
    fn id(&self) -> &'static str {
        "material/unsupported-shader"
    }

    fn category(&self) -> Category {
        Category::Material
    }

    fn description(&self) -> &'static str {
        "Material output is not a Principled BSDF and is exported as Complex"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        ctx.materials
            .iter()
            .filter_map(|m| {
                let reason = m.unsupported.as_ref()?;
                let finding = self
                    .finding(
                        format!("{}; material will need manual setup", reason),
                        &m.material_name,
                    )
                    .with_expected("Principled BSDF output");
                Some(match &m.shader_type {
                    Some(shader) => finding.with_actual_value(shader),
                    None => finding,
                })
            })
            .collect()
    }
}

pub struct MalformedGraphRule;

impl ValidationRule for MalformedGraphRule {
    fn id(&self) -> &'static str {
        "material/malformed-graph"
    }

    fn category(&self) -> Category {
        Category::Material
    }

    fn description(&self) -> &'static str {
        "Shader graph is not a well-formed DAG with a single output node"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        ctx.materials
            .iter()
            .filter(|m| !m.graph_faults.is_empty())
            .map(|m| {
                let faults: Vec<String> = m.graph_faults.iter().map(ToString::to_string).collect();
                self.finding(
                    format!("malformed shader graph: {}", faults.join("; ")),
                    &m.material_name,
                )
                .with_actual_value(format!("{} fault(s)", faults.len()))
            })
            .collect()
    }
}

pub struct ComplexInputRule;

impl ValidationRule for ComplexInputRule {
    fn id(&self) -> &'static str {
        "material/complex-input"
    }

    fn category(&self) -> Category {
        Category::Material
    }

    fn description(&self) -> &'static str {
        "Inputs fed by node chains that are not recreated on import"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Finding> {
        ctx.materials
            .iter()
            .filter(|m| m.unsupported.is_none())
            .filter_map(|m| {
                let slots: Vec<&str> = m.complex_inputs().map(|(slot, _)| slot.as_str()).collect();
                if slots.is_empty() {
                    return None;
                }
                Some(
                    self.finding(
                        format!(
                            "input(s) {} are fed by node chains and must be set up by hand",
                            slots.join(", ")
                        ),
                        &m.material_name,
                    )
                    .with_actual_value(slots.join(", "))
                    .with_suggestion("Bake the chain into a texture to export it automatically"),
                )
            })
            .collect()
    }
}
