use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, RenderErrorReason,
};
use serde_json::Value;

use super::error::{AdoptError, AdoptResult};

/// Name of the Terraform template for metric alarms
pub const ALARM_TEMPLATE: &str = "tf/cloud_watch_alarm";

const ALARM_TEMPLATE_SOURCE: &str = include_str!("../../templates/tf/cloud_watch_alarm.tf.hbs");

/// Capability that turns a named template and a context into text
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, template: &str, context: &Value) -> AdoptResult<String>;
}

/// Renders the built-in Terraform templates using Handlebars
pub struct HandlebarsRenderer {
    handlebars: Handlebars<'static>,
}

impl HandlebarsRenderer {
    /// Create a renderer with the built-in templates registered
    pub fn new() -> AdoptResult<Self> {
        let mut handlebars = Handlebars::new();

        // HCL output, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        handlebars.register_helper("hcl", Box::new(hcl_helper));
        handlebars.register_helper("json", Box::new(json_helper));

        handlebars
            .register_template_string(ALARM_TEMPLATE, ALARM_TEMPLATE_SOURCE)
            .map_err(|e| AdoptError::Render {
                template: ALARM_TEMPLATE.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { handlebars })
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    fn render(&self, template: &str, context: &Value) -> AdoptResult<String> {
        if !self.handlebars.has_template(template) {
            return Err(AdoptError::UnknownTemplate(template.to_string()));
        }

        self.handlebars
            .render(template, context)
            .map_err(|e| AdoptError::Render {
                template: template.to_string(),
                message: e.to_string(),
            })
    }
}

/// Quote a value as an HCL string literal; null renders as `""`
fn hcl_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("hcl", 0))?
        .value();

    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    out.write(&hcl_quote(&text))?;
    Ok(())
}

/// Render a value as compact JSON (valid HCL for lists of strings)
fn json_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = h
        .param(0)
        .ok_or(RenderErrorReason::ParamNotFoundForIndex("json", 0))?
        .value();

    let rendered =
        serde_json::to_string(value).map_err(|e| RenderErrorReason::Other(e.to_string()))?;
    out.write(&rendered)?;
    Ok(())
}

/// JSON string quoting plus escaping of HCL template sequences
fn hcl_quote(text: &str) -> String {
    let quoted = Value::String(text.to_string()).to_string();
    quoted.replace("${", "$${").replace("%{", "%%{")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adopt::alarm::{MetricAlarm, NamedAlarm};
    use crate::adopt::identifier::IdentifierAllocator;
    use serde_json::json;

    fn context_for(alarms: Vec<MetricAlarm>) -> Value {
        let allocator = IdentifierAllocator::seeded(3);
        let named: Vec<NamedAlarm> = alarms
            .into_iter()
            .map(|alarm| NamedAlarm {
                identifier: allocator.allocate(&alarm.alarm_name),
                alarm,
            })
            .collect();
        json!({ "alarms": named })
    }

    #[test]
    fn test_hcl_quote() {
        assert_eq!(hcl_quote("plain"), "\"plain\"");
        assert_eq!(hcl_quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(hcl_quote("${var.x} 100%{"), "\"$${var.x} 100%%{\"");
        assert_eq!(hcl_quote(""), "\"\"");
    }

    #[test]
    fn test_builtin_template_renders_empty_account() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let rendered = renderer
            .render(ALARM_TEMPLATE, &json!({ "alarms": [] }))
            .unwrap();

        assert!(!rendered.contains("resource"));
    }

    #[test]
    fn test_unknown_template() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let err = renderer.render("tf/nope", &json!({})).unwrap_err();

        assert!(matches!(err, AdoptError::UnknownTemplate(name) if name == "tf/nope"));
    }

    #[test]
    fn test_render_alarm_block() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let alarm = MetricAlarm::new("cpu alarm!!")
            .with_description("CPU \"hot\"")
            .with_alarm_action("arn:aws:sns:us-east-1:123456789012:page")
            .with_dimension("InstanceId", "i-123");
        let context = context_for(vec![alarm]);
        let identifier = context["alarms"][0]["identifier"].as_str().unwrap().to_string();

        let rendered = renderer.render(ALARM_TEMPLATE, &context).unwrap();

        assert!(rendered.contains(&format!(
            "resource \"aws_cloudwatch_metric_alarm\" \"{}\" {{",
            identifier
        )));
        assert!(rendered.contains("alarm_name                = \"cpu alarm!!\""));
        assert!(rendered.contains("alarm_description         = \"CPU \\\"hot\\\"\""));
        assert!(rendered.contains("actions_enabled           = true"));
        assert!(rendered.contains("ok_actions                = []"));
        assert!(rendered
            .contains("alarm_actions             = [\"arn:aws:sns:us-east-1:123456789012:page\"]"));
        assert!(rendered.contains("\"InstanceId\" = \"i-123\""));
        assert!(!rendered.contains("unit "));
    }

    #[test]
    fn test_render_without_description_or_dimensions() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let context = context_for(vec![MetricAlarm::new("bare").with_unit("Percent")]);

        let rendered = renderer.render(ALARM_TEMPLATE, &context).unwrap();

        assert!(rendered.contains("alarm_description         = \"\""));
        assert!(rendered.contains("unit                      = \"Percent\""));
        assert!(!rendered.contains("dimensions"));
    }

    #[test]
    fn test_render_one_block_per_alarm() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let context = context_for(vec![
            MetricAlarm::new("a"),
            MetricAlarm::new("b"),
            MetricAlarm::new("c"),
        ]);

        let rendered = renderer.render(ALARM_TEMPLATE, &context).unwrap();

        assert_eq!(rendered.matches("resource \"aws_cloudwatch_metric_alarm\"").count(), 3);
    }

    #[test]
    fn test_render_empty_collection() {
        let renderer = HandlebarsRenderer::new().unwrap();
        let rendered = renderer.render(ALARM_TEMPLATE, &context_for(vec![])).unwrap();

        assert!(rendered.trim().is_empty());
    }
}
