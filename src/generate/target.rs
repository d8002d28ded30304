use crate::naming::case::{decamelize, to_camel_case, to_pascal_case, to_snake_case};

/// Naming and placement settings shared by the three generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTarget {
    /// PascalCase feature name, e.g. "Login"
    pub feature: String,

    /// URL or path opened by the page module's navigation entry point
    pub base_url: String,

    /// Requirement identifier tagged on the specification document
    pub requirement_key: String,

    pub page_package: String,
    pub steps_package: String,
}

impl GenerationTarget {
    pub fn new(feature: &str, base_url: &str, requirement_key: &str) -> Self {
        Self {
            feature: normalize_feature(feature),
            base_url: base_url.trim().to_string(),
            requirement_key: requirement_key.trim().to_string(),
            page_package: "pages".to_string(),
            steps_package: "steps".to_string(),
        }
    }

    pub fn with_packages(mut self, page_package: &str, steps_package: &str) -> Self {
        self.page_package = page_package.to_string();
        self.steps_package = steps_package.to_string();
        self
    }

    pub fn page_class(&self) -> String {
        format!("{}Page", self.feature)
    }

    pub fn glue_class(&self) -> String {
        format!("{}Steps", self.feature)
    }

    /// Field name the glue module holds the page object under.
    pub fn page_field(&self) -> String {
        to_camel_case(&decamelize(&self.page_class()))
    }

    pub fn feature_file_stem(&self) -> String {
        to_snake_case(&self.feature)
    }

    /// Precondition step shared by the specification and glue generators.
    pub fn navigation_phrase(&self) -> String {
        format!("user is on the {} page", decamelize(&self.feature))
    }

    /// Closing verification step.
    pub fn closing_phrase(&self) -> String {
        format!("the {} flow should complete successfully", decamelize(&self.feature))
    }
}

/// "user login" / "user-login" / "UserLogin" -> "UserLogin"
pub fn normalize_feature(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let name = to_pascal_case(&spaced);
    if name.is_empty() {
        "Generated".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Feature{}", name)
    } else {
        name
    }
}
