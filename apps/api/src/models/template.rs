use serde::Serialize;

/// A generator in the static template catalog. The catalog mirrors the
/// endpoints of the remote template service; there is nothing dynamic here
/// beyond the health probe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: &'static str,
    pub endpoint: &'static str,
    pub fields: &'static [&'static str],
    pub ai_enhancement: bool,
}

pub const TEMPLATE_CATALOG: &[TemplateInfo] = &[
    TemplateInfo {
        id: "resume",
        name: "Resume Generator",
        description: "Create a professional resume with AI enhancement",
        icon: "📄",
        category: "Career",
        endpoint: "/generate-resume",
        fields: &[
            "name",
            "email",
            "phone",
            "bio",
            "skills",
            "experience",
            "education",
            "projects",
        ],
        ai_enhancement: true,
    },
    TemplateInfo {
        id: "cover-letter",
        name: "Cover Letter",
        description: "Generate personalized cover letters with AI",
        icon: "✉️",
        category: "Career",
        endpoint: "/generate-cover-letter",
        fields: &["name", "email", "company", "position", "skills", "experience"],
        ai_enhancement: true,
    },
    TemplateInfo {
        id: "proposal",
        name: "Business Proposal",
        description: "Create compelling client proposals",
        icon: "📝",
        category: "Business",
        endpoint: "/generate-proposal",
        fields: &[
            "title",
            "client",
            "project",
            "scope",
            "deliverables",
            "timeline",
            "budget",
        ],
        ai_enhancement: true,
    },
    TemplateInfo {
        id: "invoice",
        name: "Invoice Generator",
        description: "Professional invoices for your clients",
        icon: "🧾",
        category: "Business",
        endpoint: "/generate-invoice",
        fields: &["invoiceNumber", "client", "items", "total", "dueDate"],
        ai_enhancement: false,
    },
    TemplateInfo {
        id: "contract",
        name: "Contract Template",
        description: "Generate legal contracts and agreements",
        icon: "📋",
        category: "Legal",
        endpoint: "/generate-contract",
        fields: &["contractType", "parties", "terms", "dates"],
        ai_enhancement: true,
    },
    TemplateInfo {
        id: "portfolio-pdf",
        name: "Portfolio PDF",
        description: "Export your portfolio as a professional PDF",
        icon: "📁",
        category: "Portfolio",
        endpoint: "/generate-portfolio-pdf",
        fields: &["name", "title", "bio", "projects", "skills", "experience"],
        ai_enhancement: true,
    },
];
