//! Template service client: one generator per document type plus the two
//! text-AI calls.
//!
//! Inputs are forgiving: the SPA historically sent several spellings per field
//! (`clientName` / `client_name` / `client`), so each input struct enumerates
//! its accepted aliases once and a payload builder normalizes them into the
//! exact wire shape the service expects.

use std::collections::BTreeMap;

use chrono::Utc;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::models::template::{TemplateInfo, TEMPLATE_CATALOG};

use super::{underscore, GeneratedFile, RemoteError, DOCX_MIME, PDF_MIME};

#[derive(Debug, Deserialize)]
struct UpstreamError {
    error: String,
}

/// Catalog plus a liveness flag for the remote service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateList {
    pub templates: &'static [TemplateInfo],
    pub api_available: bool,
}

#[derive(Clone)]
pub struct TemplateClient {
    http: Client,
    base_url: String,
}

impl TemplateClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn health(&self) -> Result<Value, RemoteError> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(RemoteError::Network)?;
        let response = check(response).await?;
        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    /// Static catalog with a health probe of the backing service.
    pub async fn fetch_templates(&self) -> TemplateList {
        let api_available = self.health().await.is_ok();
        TemplateList {
            templates: TEMPLATE_CATALOG,
            api_available,
        }
    }

    pub fn template_by_id(id: &str) -> Option<&'static TemplateInfo> {
        TEMPLATE_CATALOG.iter().find(|t| t.id == id)
    }

    pub async fn generate_resume(&self, input: ResumeInput) -> Result<GeneratedFile, RemoteError> {
        let payload = resume_payload(input);
        let filename = format!("{}_Resume.docx", underscore(&payload.personal_info.name));
        self.generate("/generate-resume", &payload, filename, DOCX_MIME)
            .await
    }

    pub async fn generate_cover_letter(
        &self,
        input: CoverLetterInput,
    ) -> Result<GeneratedFile, RemoteError> {
        let payload = cover_letter_payload(input);
        let filename = format!(
            "{}_CoverLetter_{}.docx",
            underscore(&payload.name),
            underscore(&payload.company)
        );
        self.generate("/generate-cover-letter", &payload, filename, DOCX_MIME)
            .await
    }

    pub async fn generate_proposal(
        &self,
        input: ProposalInput,
    ) -> Result<GeneratedFile, RemoteError> {
        let payload = proposal_payload(input);
        let filename = format!(
            "Proposal_{}_{}.docx",
            underscore(&payload.client_name),
            underscore(&payload.project_title)
        );
        self.generate("/generate-proposal", &payload, filename, DOCX_MIME)
            .await
    }

    pub async fn generate_invoice(
        &self,
        input: InvoiceInput,
    ) -> Result<GeneratedFile, RemoteError> {
        let payload = invoice_payload(input);
        let filename = format!("Invoice_{}.docx", payload.invoice_number.replace('/', "-"));
        self.generate("/generate-invoice", &payload, filename, DOCX_MIME)
            .await
    }

    pub async fn generate_contract(
        &self,
        input: ContractInput,
    ) -> Result<GeneratedFile, RemoteError> {
        let payload = contract_payload(input);
        let filename = format!("{}_Contract.docx", underscore(&payload.contract_type));
        self.generate("/generate-contract", &payload, filename, DOCX_MIME)
            .await
    }

    pub async fn generate_portfolio_pdf(
        &self,
        input: PortfolioPdfInput,
    ) -> Result<GeneratedFile, RemoteError> {
        let payload = portfolio_pdf_payload(input);
        let filename = format!("{}_Portfolio.pdf", underscore(&payload.name));
        self.generate("/generate-portfolio-pdf", &payload, filename, PDF_MIME)
            .await
    }

    /// Rewrites a free-text description; returns both versions.
    pub async fn enhance_description(
        &self,
        input: EnhanceTextInput,
    ) -> Result<EnhancedText, RemoteError> {
        let payload = enhance_text_payload(input);
        let response = self
            .http
            .post(format!("{}/enhance-description", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(RemoteError::Network)?;
        let response = check(response).await?;
        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    /// Builds a professional summary from a skill list.
    pub async fn skills_summary(
        &self,
        input: SkillsSummaryInput,
    ) -> Result<SkillsSummary, RemoteError> {
        let payload = SkillsSummaryPayload {
            skills: input.skills,
            experience_years: input.experience_years,
        };
        let response = self
            .http
            .post(format!("{}/enhance-skills-summary", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(RemoteError::Network)?;
        let response = check(response).await?;
        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn generate<P: Serialize>(
        &self,
        path: &str,
        payload: &P,
        filename: String,
        content_type: &'static str,
    ) -> Result<GeneratedFile, RemoteError> {
        info!("generating {filename}");
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(payload)
            .send()
            .await
            .map_err(RemoteError::Network)?;
        let response = check(response).await?;

        let bytes = response.bytes().await.map_err(RemoteError::Network)?;
        Ok(GeneratedFile {
            bytes,
            filename,
            content_type,
        })
    }
}

async fn check(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<UpstreamError>()
        .await
        .ok()
        .map(|body| body.error)
        .filter(|error| !error.is_empty())
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
    Err(RemoteError::Upstream {
        status: status.as_u16(),
        message,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Resume
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeInput {
    pub name: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
    pub bio: String,
    pub summary: String,
    pub socials: BTreeMap<String, String>,
    pub experience: Vec<Value>,
    pub education: Vec<Value>,
    pub skills: Vec<String>,
    pub certifications: Vec<Value>,
    pub projects: Vec<Value>,
    #[serde(rename = "enhanceWithAI", alias = "enhance_with_ai")]
    pub enhance_with_ai: bool,
}

#[derive(Debug, Serialize)]
pub struct ResumePayload {
    pub personal_info: PersonalInfo,
    pub summary: String,
    pub experience: Vec<Value>,
    pub education: Vec<Value>,
    pub skills: Vec<String>,
    pub certifications: Vec<Value>,
    pub projects: Vec<Value>,
    pub enhance_with_ai: bool,
}

#[derive(Debug, Serialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub website: String,
}

fn resume_payload(input: ResumeInput) -> ResumePayload {
    let social = |key: &str| input.socials.get(key).cloned().unwrap_or_default();
    ResumePayload {
        personal_info: PersonalInfo {
            name: pick(input.name, input.display_name),
            email: input.email,
            phone: input.phone,
            location: input.location,
            linkedin: pick(input.linkedin, social("linkedin")),
            website: pick(input.website, social("website")),
        },
        summary: pick(input.bio, input.summary),
        experience: input.experience,
        education: input.education,
        skills: input.skills,
        certifications: input.certifications,
        projects: input.projects,
        // Off by default on this path.
        enhance_with_ai: input.enhance_with_ai,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cover letter
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverLetterInput {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub company: String,
    #[serde(alias = "hiring_manager")]
    pub hiring_manager: String,
    pub position: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub tone: String,
    #[serde(alias = "custom_content")]
    pub custom_content: String,
    pub content: String,
    #[serde(rename = "generateWithAI", alias = "generate_with_ai")]
    pub generate_with_ai: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterPayload {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub company: String,
    pub hiring_manager: String,
    pub position: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub tone: String,
    pub custom_content: String,
    pub generate_with_ai: bool,
}

fn cover_letter_payload(input: CoverLetterInput) -> CoverLetterPayload {
    CoverLetterPayload {
        name: input.name,
        address: input.address,
        email: input.email,
        phone: input.phone,
        date: pick(input.date, long_date()),
        company: input.company,
        hiring_manager: input.hiring_manager,
        position: input.position,
        skills: input.skills,
        experience: input.experience,
        tone: pick(input.tone, "formal".to_string()),
        custom_content: pick(input.custom_content, input.content),
        // On unless explicitly disabled.
        generate_with_ai: input.generate_with_ai != Some(false),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Proposal
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProposalInput {
    pub title: String,
    #[serde(alias = "client_name", alias = "client")]
    pub client_name: String,
    #[serde(alias = "prepared_by")]
    pub prepared_by: String,
    pub date: String,
    #[serde(alias = "project_title")]
    pub project_title: String,
    pub scope: String,
    pub description: String,
    pub deliverables: Vec<String>,
    pub timeline: String,
    pub budget: String,
    #[serde(rename = "generateWithAI", alias = "generate_with_ai")]
    pub generate_with_ai: Option<bool>,
    #[serde(alias = "custom_content")]
    pub custom_content: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ProposalPayload {
    pub title: String,
    pub client_name: String,
    pub prepared_by: String,
    pub date: String,
    pub project_title: String,
    pub scope: String,
    pub deliverables: Vec<String>,
    pub timeline: String,
    pub budget: String,
    pub generate_with_ai: bool,
    pub custom_content: String,
}

fn proposal_payload(input: ProposalInput) -> ProposalPayload {
    ProposalPayload {
        title: pick(input.title, "Business Proposal".to_string()),
        client_name: input.client_name,
        prepared_by: pick(input.prepared_by, "Your Company".to_string()),
        date: pick(input.date, long_date()),
        project_title: input.project_title,
        scope: pick(input.scope, input.description),
        deliverables: input.deliverables,
        timeline: input.timeline,
        budget: input.budget,
        generate_with_ai: input.generate_with_ai != Some(false),
        custom_content: pick(input.custom_content, input.content),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Invoice
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartyInfo {
    pub name: String,
    pub address: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InvoiceInput {
    #[serde(alias = "invoice_number")]
    pub invoice_number: String,
    #[serde(alias = "invoice_date")]
    pub invoice_date: String,
    #[serde(alias = "due_date")]
    pub due_date: String,
    #[serde(alias = "from_info")]
    pub from_info: PartyInfo,
    #[serde(alias = "to_info")]
    pub to_info: PartyInfo,
    pub client_name: String,
    pub client_email: String,
    pub items: Vec<Value>,
    #[serde(alias = "tax_rate")]
    pub tax_rate: f64,
    pub discount: f64,
    pub notes: String,
    #[serde(alias = "payment_instructions")]
    pub payment_instructions: String,
}

#[derive(Debug, Serialize)]
pub struct InvoicePayload {
    pub invoice_number: String,
    pub invoice_date: String,
    pub due_date: String,
    pub from_info: PartyInfo,
    pub to_info: BillTo,
    pub items: Vec<Value>,
    pub tax_rate: f64,
    pub discount: f64,
    pub notes: String,
    pub payment_instructions: String,
}

#[derive(Debug, Serialize)]
pub struct BillTo {
    pub name: String,
    pub address: String,
    pub email: String,
}

fn invoice_payload(input: InvoiceInput) -> InvoicePayload {
    InvoicePayload {
        invoice_number: pick(input.invoice_number, default_invoice_number()),
        invoice_date: pick(input.invoice_date, iso_date()),
        due_date: input.due_date,
        from_info: input.from_info,
        to_info: BillTo {
            name: pick(input.to_info.name, input.client_name),
            address: input.to_info.address,
            email: pick(input.to_info.email, input.client_email),
        },
        items: input.items,
        tax_rate: input.tax_rate,
        discount: input.discount,
        notes: input.notes,
        payment_instructions: input.payment_instructions,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Contract
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Party {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContractInput {
    #[serde(alias = "contract_type")]
    pub contract_type: String,
    pub date: String,
    pub party1: Party,
    pub party2: Party,
    pub freelancer_name: String,
    pub client_name: String,
    #[serde(alias = "effective_date", alias = "startDate")]
    pub effective_date: String,
    #[serde(alias = "expiration_date", alias = "endDate")]
    pub expiration_date: String,
    #[serde(alias = "custom_terms", alias = "payment")]
    pub custom_terms: String,
    #[serde(rename = "generateWithAI", alias = "generate_with_ai")]
    pub generate_with_ai: Option<bool>,
    #[serde(alias = "custom_content")]
    pub custom_content: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ContractPayload {
    pub contract_type: String,
    pub date: String,
    pub party1: Party,
    pub party2: Party,
    pub effective_date: String,
    pub expiration_date: String,
    pub custom_terms: String,
    pub generate_with_ai: bool,
    pub custom_content: String,
}

fn contract_payload(input: ContractInput) -> ContractPayload {
    ContractPayload {
        contract_type: pick(input.contract_type, "Service Agreement".to_string()),
        date: pick(input.date, long_date()),
        party1: Party {
            name: pick(input.party1.name, input.freelancer_name),
            address: input.party1.address,
        },
        party2: Party {
            name: pick(input.party2.name, input.client_name),
            address: input.party2.address,
        },
        effective_date: input.effective_date,
        expiration_date: input.expiration_date,
        custom_terms: input.custom_terms,
        generate_with_ai: input.generate_with_ai != Some(false),
        custom_content: pick(input.custom_content, input.content),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Portfolio PDF
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub website: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortfolioPdfInput {
    pub name: String,
    pub display_name: String,
    pub title: String,
    pub bio: String,
    pub email: String,
    pub phone: String,
    pub website: String,
    pub linkedin: String,
    pub contact: ContactInfo,
    pub socials: BTreeMap<String, String>,
    pub skills: Vec<String>,
    pub experience: Vec<Value>,
    pub education: Vec<Value>,
    pub projects: Vec<Value>,
    pub certifications: Vec<Value>,
    #[serde(rename = "enhanceWithAI", alias = "enhance_with_ai")]
    pub enhance_with_ai: bool,
}

#[derive(Debug, Serialize)]
pub struct PortfolioPdfPayload {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub contact: ContactPayload,
    pub skills: Vec<String>,
    pub experience: Vec<Value>,
    pub education: Vec<Value>,
    pub projects: Vec<Value>,
    pub certifications: Vec<Value>,
    pub enhance_with_ai: bool,
}

#[derive(Debug, Serialize)]
pub struct ContactPayload {
    pub email: String,
    pub phone: String,
    pub website: String,
    pub linkedin: String,
}

fn portfolio_pdf_payload(input: PortfolioPdfInput) -> PortfolioPdfPayload {
    let social = |key: &str| input.socials.get(key).cloned().unwrap_or_default();
    PortfolioPdfPayload {
        name: pick(input.name, input.display_name),
        title: input.title,
        bio: input.bio,
        contact: ContactPayload {
            email: pick(input.email, input.contact.email),
            phone: pick(input.phone, input.contact.phone),
            website: pick(input.website, pick(input.contact.website, social("website"))),
            linkedin: pick(
                input.linkedin,
                pick(input.contact.linkedin, social("linkedin")),
            ),
        },
        skills: input.skills,
        experience: input.experience,
        education: input.education,
        projects: input.projects,
        certifications: input.certifications,
        enhance_with_ai: input.enhance_with_ai,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Text AI
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnhanceTextInput {
    pub text: String,
    pub context: String,
    pub role: String,
    pub technologies: Vec<String>,
}

#[derive(Debug, Serialize)]
struct EnhanceTextPayload {
    text: String,
    context: String,
    role: String,
    technologies: Vec<String>,
    your_role: String,
}

fn enhance_text_payload(input: EnhanceTextInput) -> EnhanceTextPayload {
    let context = pick(input.context, "general".to_string());
    EnhanceTextPayload {
        text: input.text,
        context,
        role: input.role.clone(),
        technologies: input.technologies,
        your_role: input.role,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancedText {
    pub original: String,
    pub enhanced: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillsSummaryInput {
    pub skills: Vec<String>,
    #[serde(alias = "experience_years")]
    pub experience_years: i64,
}

#[derive(Debug, Serialize)]
struct SkillsSummaryPayload {
    skills: Vec<String>,
    experience_years: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsSummary {
    pub summary: String,
    pub skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Defaults
// ────────────────────────────────────────────────────────────────────────────

fn pick(primary: String, fallback: String) -> String {
    if primary.is_empty() {
        fallback
    } else {
        primary
    }
}

/// "August 5, 2026", the long format the generated letters print.
fn long_date() -> String {
    Utc::now().format("%B %-d, %Y").to_string()
}

fn iso_date() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

fn default_invoice_number() -> String {
    format!("INV-{}", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};
    use axum::Router;

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn proposal_accepts_every_client_alias() {
        for payload in [
            r#"{"clientName": "Acme"}"#,
            r#"{"client_name": "Acme"}"#,
            r#"{"client": "Acme"}"#,
        ] {
            let input: ProposalInput = serde_json::from_str(payload).unwrap();
            assert_eq!(input.client_name, "Acme", "failed for {payload}");
        }
    }

    #[test]
    fn contract_accepts_date_aliases() {
        let input: ContractInput =
            serde_json::from_str(r#"{"startDate": "2026-01-01", "endDate": "2026-12-31"}"#)
                .unwrap();
        assert_eq!(input.effective_date, "2026-01-01");
        assert_eq!(input.expiration_date, "2026-12-31");
    }

    #[test]
    fn proposal_defaults_title_and_tone_of_ai() {
        let payload = proposal_payload(ProposalInput::default());
        assert_eq!(payload.title, "Business Proposal");
        assert_eq!(payload.prepared_by, "Your Company");
        assert!(payload.generate_with_ai);
        assert!(!payload.date.is_empty());
    }

    #[test]
    fn cover_letter_defaults_tone_and_ai() {
        let payload = cover_letter_payload(CoverLetterInput::default());
        assert_eq!(payload.tone, "formal");
        assert!(payload.generate_with_ai);

        let payload = cover_letter_payload(CoverLetterInput {
            generate_with_ai: Some(false),
            ..CoverLetterInput::default()
        });
        assert!(!payload.generate_with_ai);
    }

    #[test]
    fn resume_ai_enhancement_is_off_by_default() {
        let payload = resume_payload(ResumeInput::default());
        assert!(!payload.enhance_with_ai);
    }

    #[test]
    fn resume_falls_back_to_display_name_and_socials() {
        let mut socials = BTreeMap::new();
        socials.insert("linkedin".to_string(), "in/janedoe".to_string());
        let payload = resume_payload(ResumeInput {
            display_name: "Jane Doe".to_string(),
            socials,
            ..ResumeInput::default()
        });
        assert_eq!(payload.personal_info.name, "Jane Doe");
        assert_eq!(payload.personal_info.linkedin, "in/janedoe");
    }

    #[test]
    fn invoice_defaults_number_and_date_and_bill_to_fallbacks() {
        let payload = invoice_payload(InvoiceInput {
            client_name: "Acme".to_string(),
            client_email: "billing@acme.test".to_string(),
            ..InvoiceInput::default()
        });
        assert!(payload.invoice_number.starts_with("INV-"));
        assert_eq!(payload.invoice_date.len(), 10); // YYYY-MM-DD
        assert_eq!(payload.to_info.name, "Acme");
        assert_eq!(payload.to_info.email, "billing@acme.test");
    }

    #[test]
    fn contract_party_fallbacks_apply() {
        let payload = contract_payload(ContractInput {
            freelancer_name: "Jane Doe".to_string(),
            client_name: "Acme".to_string(),
            ..ContractInput::default()
        });
        assert_eq!(payload.contract_type, "Service Agreement");
        assert_eq!(payload.party1.name, "Jane Doe");
        assert_eq!(payload.party2.name, "Acme");
    }

    #[test]
    fn enhance_text_mirrors_role_into_your_role() {
        let payload = enhance_text_payload(EnhanceTextInput {
            text: "built stuff".to_string(),
            role: "backend dev".to_string(),
            ..EnhanceTextInput::default()
        });
        assert_eq!(payload.context, "general");
        assert_eq!(payload.your_role, "backend dev");
    }

    #[tokio::test]
    async fn generated_filenames_underscore_names() {
        let router = Router::new()
            .route("/generate-resume", post(|| async { vec![1u8] }))
            .route("/generate-invoice", post(|| async { vec![1u8] }))
            .route("/generate-portfolio-pdf", post(|| async { vec![1u8] }));
        let base = spawn(router).await;
        let client = TemplateClient::new(base);

        let resume = client
            .generate_resume(ResumeInput {
                name: "Jane Doe".to_string(),
                ..ResumeInput::default()
            })
            .await
            .unwrap();
        assert_eq!(resume.filename, "Jane_Doe_Resume.docx");
        assert_eq!(resume.content_type, DOCX_MIME);

        let invoice = client
            .generate_invoice(InvoiceInput {
                invoice_number: "2026/08/001".to_string(),
                ..InvoiceInput::default()
            })
            .await
            .unwrap();
        assert_eq!(invoice.filename, "Invoice_2026-08-001.docx");

        let portfolio = client
            .generate_portfolio_pdf(PortfolioPdfInput {
                name: "Jane Doe".to_string(),
                ..PortfolioPdfInput::default()
            })
            .await
            .unwrap();
        assert_eq!(portfolio.filename, "Jane_Doe_Portfolio.pdf");
        assert_eq!(portfolio.content_type, PDF_MIME);
    }

    #[tokio::test]
    async fn upstream_error_message_is_parsed_or_generic() {
        let router = Router::new()
            .route(
                "/generate-proposal",
                post(|| async {
                    (
                        axum::http::StatusCode::BAD_REQUEST,
                        axum::Json(serde_json::json!({ "error": "missing scope" })),
                    )
                }),
            )
            .route(
                "/generate-contract",
                post(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
            );
        let client = TemplateClient::new(spawn(router).await);

        let err = client
            .generate_proposal(ProposalInput::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RemoteError::Upstream { status: 400, ref message } if message == "missing scope"
        ));

        let err = client
            .generate_contract(ContractInput::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RemoteError::Upstream { status: 500, ref message } if message == "HTTP error! status: 500"
        ));
    }

    #[tokio::test]
    async fn enhance_description_round_trip() {
        let router = Router::new().route(
            "/enhance-description",
            post(|| async {
                axum::Json(serde_json::json!({
                    "original": "built stuff",
                    "enhanced": "Engineered production systems"
                }))
            }),
        );
        let client = TemplateClient::new(spawn(router).await);

        let result = client
            .enhance_description(EnhanceTextInput {
                text: "built stuff".to_string(),
                ..EnhanceTextInput::default()
            })
            .await
            .unwrap();
        assert_eq!(result.enhanced, "Engineered production systems");
        assert_eq!(result.original, "built stuff");
    }

    #[tokio::test]
    async fn catalog_reports_api_availability() {
        let router =
            Router::new().route("/health", get(|| async { axum::Json(serde_json::json!({"status": "ok"})) }));
        let client = TemplateClient::new(spawn(router).await);

        let list = client.fetch_templates().await;
        assert!(list.api_available);
        assert_eq!(list.templates.len(), 6);

        let offline = TemplateClient::new("http://127.0.0.1:9");
        assert!(!offline.fetch_templates().await.api_available);

        assert!(TemplateClient::template_by_id("invoice").is_some());
        assert!(TemplateClient::template_by_id("nope").is_none());
    }
}
