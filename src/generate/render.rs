use crate::generate::document::{
    GlueModule, HandlerArgument, HandlerBody, PageModule, Primitive, SpecificationDocument,
    StepKeyword,
};

const GENERATED_NOTICE: &str = "Generated by stepweaver. Re-run the generator instead of editing by hand.";

// ============================================================================
// Page module -> Java (Playwright)
// ============================================================================

/// Render the page-module tree as a Playwright page class.
///
/// ```text
/// public class LoginPage {
///     private static final String PAGE_URL = "/login";
///     private static final String USERNAME_2 = "#username";
///     ...
///     public void enterUsername(String text) {
///         System.out.println("[LoginPage] enterUsername");
///         locate(USERNAME_2).fill(text);
///     }
/// }
/// ```
pub fn render_page_module(page: &PageModule) -> String {
    let mut out = String::new();

    if !page.package.is_empty() {
        out.push_str(&format!("package {};\n\n", page.package));
    }
    out.push_str("import com.microsoft.playwright.Locator;\n");
    out.push_str("import com.microsoft.playwright.Page;\n\n");
    out.push_str(&format!("/** {} */\n", GENERATED_NOTICE));
    out.push_str(&format!("public class {} {{\n\n", page.class_name));

    out.push_str(&format!(
        "    private static final String PAGE_URL = {};\n",
        java_string(&page.navigation.url)
    ));
    for constant in &page.constants {
        out.push_str(&format!(
            "    private static final String {} = {};\n",
            constant.name,
            java_string(&constant.selector)
        ));
    }

    out.push_str("\n    private final Page page;\n\n");
    out.push_str(&format!("    public {}(Page page) {{\n", page.class_name));
    out.push_str("        this.page = page;\n    }\n\n");

    out.push_str(&format!("    public void {}() {{\n", page.navigation.name));
    out.push_str(&format!(
        "        System.out.println(\"[{}] {} \" + PAGE_URL);\n",
        page.class_name, page.navigation.name
    ));
    out.push_str("        page.navigate(PAGE_URL);\n    }\n");

    for method in &page.methods {
        let param = method.primitive.parameter();
        let signature = param.map(|p| format!("String {}", p)).unwrap_or_default();
        let call = match (method.primitive, param) {
            (Primitive::Click, _) => "click()".to_string(),
            (Primitive::Check, _) => "check()".to_string(),
            (Primitive::Fill, Some(p)) => format!("fill({})", p),
            (Primitive::SelectOption, Some(p)) => format!("selectOption({})", p),
            (Primitive::Press, Some(p)) => format!("press({})", p),
            (_, None) => "click()".to_string(),
        };

        out.push('\n');
        out.push_str(&format!("    public void {}({}) {{\n", method.name, signature));
        out.push_str(&format!(
            "        System.out.println(\"[{}] {}\");\n",
            page.class_name, method.name
        ));
        out.push_str(&format!("        locate({}).{};\n", method.constant, call));
        out.push_str("    }\n");
    }

    out.push_str(LOCATE_HELPER);
    out.push_str("}\n");
    out
}

const LOCATE_HELPER: &str = r#"
    private Locator locate(String selector) {
        if (selector.startsWith("label=")) {
            return page.getByLabel(selector.substring("label=".length()));
        }
        if (selector.startsWith("placeholder=")) {
            return page.getByPlaceholder(selector.substring("placeholder=".length()));
        }
        return page.locator(selector);
    }
"#;

// ============================================================================
// Specification document -> Gherkin
// ============================================================================

pub fn render_specification(doc: &SpecificationDocument) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n", GENERATED_NOTICE));
    if !doc.tags.is_empty() {
        out.push_str(&doc.tags.join(" "));
        out.push('\n');
    }
    out.push_str(&format!("Feature: {}\n", doc.feature));
    for line in &doc.description {
        out.push_str(&format!("  {}\n", line));
    }

    for scenario in &doc.scenarios {
        out.push_str(&format!("\n  Scenario: {}\n", scenario.name));
        for step in &scenario.steps {
            match step.keyword {
                Some(keyword) => out.push_str(&format!("    {} {}\n", keyword.as_str(), step.text)),
                None => out.push_str(&format!("    {}\n", step.text)),
            }
        }
    }
    out
}

// ============================================================================
// Glue module -> Java (Cucumber-JVM)
// ============================================================================

pub fn render_glue(glue: &GlueModule) -> String {
    let mut out = String::new();

    if !glue.package.is_empty() {
        out.push_str(&format!("package {};\n\n", glue.package));
    }
    if glue.has_pending() {
        out.push_str("import io.cucumber.java.PendingException;\n");
    }
    for keyword in [StepKeyword::Given, StepKeyword::Then, StepKeyword::When] {
        if glue.uses_keyword(keyword) {
            out.push_str(&format!("import io.cucumber.java.en.{};\n", keyword.as_str()));
        }
    }
    if glue.page_package.is_empty() || glue.page_package == glue.package {
        out.push('\n');
    } else {
        out.push_str(&format!("import {}.{};\n\n", glue.page_package, glue.page_class));
    }

    out.push_str(&format!("/** {} */\n", GENERATED_NOTICE));
    out.push_str(&format!("public class {} {{\n\n", glue.class_name));
    out.push_str(&format!("    private final {} {};\n\n", glue.page_class, glue.page_field));
    out.push_str(&format!(
        "    public {}({} {}) {{\n        this.{} = {};\n    }}\n",
        glue.class_name, glue.page_class, glue.page_field, glue.page_field, glue.page_field
    ));

    for handler in &glue.handlers {
        let takes_value = matches!(
            handler.body,
            HandlerBody::Call {
                argument: HandlerArgument::Parameter,
                ..
            }
        );
        let signature = if takes_value { "String value" } else { "" };

        out.push('\n');
        out.push_str(&format!(
            "    @{}({})\n",
            handler.keyword.as_str(),
            java_string(&handler.expression)
        ));
        out.push_str(&format!("    public void {}({}) {{\n", handler.function_name, signature));
        match &handler.body {
            HandlerBody::Call { method, argument } => {
                let arg = match argument {
                    HandlerArgument::None => String::new(),
                    HandlerArgument::Parameter => "value".to_string(),
                    HandlerArgument::Literal(v) => java_string(v),
                };
                out.push_str(&format!("        {}.{}({});\n", glue.page_field, method, arg));
            }
            HandlerBody::Pending => {
                out.push_str("        throw new PendingException();\n");
            }
            HandlerBody::PassThrough => {
                out.push_str("        // verification placeholder: the flow completed without errors\n");
            }
        }
        out.push_str("    }\n");
    }

    out.push_str("}\n");
    out
}

// ============================================================================
// Helpers
// ============================================================================

/// Quote a value as a Java string literal.
pub fn java_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
