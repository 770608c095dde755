use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateType {
    Email,
    Sms,
    Letter,
    LetterPdf,
    Nhsapp,
}

/// A template reference as it appears in a routing config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateDescriptor {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: TemplateType,
}

/// Templates reported back by the duplicate-templates routing plan, in
/// the order consumers expect to see them.
pub const DUPLICATE_TEMPLATES: [TemplateDescriptor; 5] = [
    TemplateDescriptor { name: "EMAIL_TEMPLATE", kind: TemplateType::Email },
    TemplateDescriptor { name: "SMS_TEMPLATE", kind: TemplateType::Sms },
    TemplateDescriptor { name: "LETTER_TEMPLATE", kind: TemplateType::Letter },
    TemplateDescriptor { name: "LETTER_PDF_TEMPLATE", kind: TemplateType::LetterPdf },
    TemplateDescriptor { name: "NHSAPP_TEMPLATE", kind: TemplateType::Nhsapp },
];

/// Internal template id reported by the missing NHS App template plan.
pub const MISSING_NHS_TEMPLATE_ID: &str = "invalid-template";
