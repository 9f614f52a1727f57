//! Publish collaborators: one outbound REST call per target. Tokens come
//! from the request body with an environment fallback and are never stored.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::Config;
use crate::errors::ForgeError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubDeployResult {
    pub url: String,
    pub gist_url: String,
    pub raw_url: String,
    pub gist_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetlifyDeployResult {
    pub url: String,
    pub site_id: String,
    pub site_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VercelDeployResult {
    pub url: String,
    pub deployment_id: String,
    pub project_name: String,
}

/// Lowercases, maps every non-`[a-z0-9-]` run of characters to `-`, and caps
/// the length. Matches what the hosting targets accept as a site name.
pub fn slugify(name: &str, max_len: usize) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' { c } else { '-' })
        .take(max_len)
        .collect()
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;
    for &b in data {
        crc ^= b as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// One-entry zip archive with a stored (uncompressed) payload. Netlify's
/// sites API takes a zip body; nothing here needs real compression.
pub fn single_file_zip(file_name: &str, data: &[u8]) -> Vec<u8> {
    let name = file_name.as_bytes();
    let crc = crc32(data);
    let size = data.len() as u32;

    let mut out = Vec::with_capacity(data.len() + name.len() * 2 + 98);

    // Local file header
    out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
    out.extend_from_slice(&20u16.to_le_bytes()); // version needed
    out.extend_from_slice(&0u16.to_le_bytes()); // flags
    out.extend_from_slice(&0u16.to_le_bytes()); // method: stored
    out.extend_from_slice(&0u16.to_le_bytes()); // mod time
    out.extend_from_slice(&0u16.to_le_bytes()); // mod date
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes()); // compressed
    out.extend_from_slice(&size.to_le_bytes()); // uncompressed
    out.extend_from_slice(&(name.len() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // extra len
    out.extend_from_slice(name);
    out.extend_from_slice(data);

    // Central directory
    let cd_offset = out.len() as u32;
    out.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
    out.extend_from_slice(&20u16.to_le_bytes()); // version made by
    out.extend_from_slice(&20u16.to_le_bytes()); // version needed
    out.extend_from_slice(&0u16.to_le_bytes()); // flags
    out.extend_from_slice(&0u16.to_le_bytes()); // method
    out.extend_from_slice(&0u16.to_le_bytes()); // mod time
    out.extend_from_slice(&0u16.to_le_bytes()); // mod date
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&size.to_le_bytes());
    out.extend_from_slice(&(name.len() as u16).to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // extra len
    out.extend_from_slice(&0u16.to_le_bytes()); // comment len
    out.extend_from_slice(&0u16.to_le_bytes()); // disk number
    out.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
    out.extend_from_slice(&0u32.to_le_bytes()); // external attrs
    out.extend_from_slice(&0u32.to_le_bytes()); // local header offset
    out.extend_from_slice(name);
    let cd_size = out.len() as u32 - cd_offset;

    // End of central directory
    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // disk number
    out.extend_from_slice(&0u16.to_le_bytes()); // cd start disk
    out.extend_from_slice(&1u16.to_le_bytes()); // entries on disk
    out.extend_from_slice(&1u16.to_le_bytes()); // total entries
    out.extend_from_slice(&cd_size.to_le_bytes());
    out.extend_from_slice(&cd_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes()); // comment len

    out
}

pub struct Deployer {
    cfg: Config,
    client: Client,
    timeout: Duration,
}

impl Deployer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            cfg: cfg.clone(),
            client: Client::new(),
            timeout: Duration::from_secs(cfg.deploy_timeout_secs),
        }
    }

    fn require_html(req: &DeployRequest) -> Result<(), ForgeError> {
        if req.html.is_empty() {
            return Err(ForgeError::validation("HTML content is required"));
        }
        Ok(())
    }

    fn resolve_token(
        body_token: &Option<String>,
        fallback: &Option<String>,
        missing_msg: &str,
    ) -> Result<String, ForgeError> {
        body_token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| fallback.clone())
            .ok_or_else(|| ForgeError::validation(missing_msg))
    }

    /// Publishes the HTML as a public gist and returns a githack view URL.
    pub async fn github(&self, req: &DeployRequest) -> Result<GithubDeployResult, ForgeError> {
        Self::require_html(req)?;
        let token = Self::resolve_token(
            &req.token,
            &self.cfg.github_token,
            "GitHub token is required. Please provide your GitHub Personal Access Token.",
        )?;

        let project = req.project_name.as_deref().unwrap_or("ai-generated-website");
        let file_name = format!("{}.html", slugify(project, 50));
        let description = format!("AI-generated website: {}",
            req.project_name.as_deref().unwrap_or("Untitled"));

        let mut files = serde_json::Map::new();
        files.insert(file_name.clone(), json!({ "content": req.html }));

        let url = format!("{}/gists", self.cfg.github_api_base.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "siteforge")
            .timeout(self.timeout)
            .json(&json!({
                "description": description,
                "public": true,
                "files": files,
            }))
            .send()
            .await
            .map_err(|e| ForgeError::upstream(format!("Failed to create GitHub gist: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ForgeError::upstream(format!("Failed to create GitHub gist: {e}")))?;
        if !status.is_success() {
            log::error!("github gist creation failed ({status}): {text}");
            return Err(ForgeError::upstream(format!("Failed to create GitHub gist: {text}")));
        }

        #[derive(Deserialize)]
        struct GistFile {
            raw_url: String,
        }
        #[derive(Deserialize)]
        struct Gist {
            id: String,
            html_url: String,
            files: std::collections::HashMap<String, GistFile>,
        }

        let gist: Gist = serde_json::from_str(&text)
            .map_err(|e| ForgeError::upstream(format!("Failed to create GitHub gist: {e}")))?;
        let raw_url = gist
            .files
            .get(&file_name)
            .map(|f| f.raw_url.clone())
            .unwrap_or_default();

        Ok(GithubDeployResult {
            url: format!("https://gist.githack.com/anonymous/{}/raw/{}", gist.id, file_name),
            gist_url: gist.html_url,
            raw_url,
            gist_id: gist.id,
        })
    }

    /// Uploads a single-file zip to the Netlify sites API.
    pub async fn netlify(&self, req: &DeployRequest) -> Result<NetlifyDeployResult, ForgeError> {
        Self::require_html(req)?;
        let token = Self::resolve_token(
            &req.token,
            &self.cfg.netlify_token,
            "Netlify token is required. Please provide your Netlify Access Token.",
        )?;

        let archive = single_file_zip("index.html", req.html.as_bytes());
        let url = format!("{}/api/v1/sites", self.cfg.netlify_api_base.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .header("Content-Type", "application/zip")
            .timeout(self.timeout)
            .body(archive)
            .send()
            .await
            .map_err(|e| ForgeError::upstream(format!("Failed to deploy to Netlify: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ForgeError::upstream(format!("Failed to deploy to Netlify: {e}")))?;
        if !status.is_success() {
            log::error!("netlify deployment failed ({status}): {text}");
            return Err(ForgeError::upstream(format!("Failed to deploy to Netlify: {text}")));
        }

        #[derive(Deserialize)]
        struct Site {
            id: String,
            name: String,
            url: String,
            #[serde(default)]
            ssl_url: Option<String>,
        }

        let site: Site = serde_json::from_str(&text)
            .map_err(|e| ForgeError::upstream(format!("Failed to deploy to Netlify: {e}")))?;

        Ok(NetlifyDeployResult {
            url: site.ssl_url.unwrap_or(site.url),
            site_id: site.id,
            site_name: site.name,
        })
    }

    /// Creates a Vercel v13 deployment carrying the HTML as one inline file.
    pub async fn vercel(&self, req: &DeployRequest) -> Result<VercelDeployResult, ForgeError> {
        Self::require_html(req)?;
        let token = Self::resolve_token(
            &req.token,
            &self.cfg.vercel_token,
            "Vercel token is required. Please provide your Vercel Access Token.",
        )?;

        let project = req.project_name.as_deref().unwrap_or("ai-generated-site");
        let slug = format!(
            "{}-{}",
            slugify(project, 50),
            chrono::Utc::now().timestamp_millis()
        );

        let url = format!("{}/v13/deployments", self.cfg.vercel_api_base.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .timeout(self.timeout)
            .json(&json!({
                "name": slug,
                "files": [ { "file": "index.html", "data": req.html } ],
                "projectSettings": { "framework": null },
            }))
            .send()
            .await
            .map_err(|e| ForgeError::upstream(format!("Failed to deploy to Vercel: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ForgeError::upstream(format!("Failed to deploy to Vercel: {e}")))?;
        if !status.is_success() {
            log::error!("vercel deployment failed ({status}): {text}");
            return Err(ForgeError::upstream(format!("Failed to deploy to Vercel: {text}")));
        }

        #[derive(Deserialize)]
        struct Deployment {
            id: String,
            url: String,
        }

        let deployment: Deployment = serde_json::from_str(&text)
            .map_err(|e| ForgeError::upstream(format!("Failed to deploy to Vercel: {e}")))?;

        Ok(VercelDeployResult {
            url: format!("https://{}", deployment.url),
            deployment_id: deployment.id,
            project_name: slug,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slugify_lowercases_and_replaces_punctuation() {
        assert_eq!(slugify("My Cool Site!", 50), "my-cool-site-");
        assert_eq!(slugify("shop_2024 (v2)", 50), "shop-2024--v2-");
    }

    #[test]
    fn slugify_caps_length() {
        let long = "a".repeat(80);
        assert_eq!(slugify(&long, 50).len(), 50);
    }

    #[test]
    fn zip_layout_has_expected_signatures_and_sizes() {
        let archive = single_file_zip("index.html", b"<html></html>");
        // Local header signature
        assert_eq!(&archive[..4], &0x0403_4b50u32.to_le_bytes());
        // Stored method
        assert_eq!(&archive[8..10], &0u16.to_le_bytes());
        // Payload is embedded verbatim
        let name_start = 30;
        assert_eq!(&archive[name_start..name_start + 10], b"index.html");
        assert_eq!(&archive[name_start + 10..name_start + 23], b"<html></html>");
        // EOCD signature at the tail, one entry
        let eocd = archive.len() - 22;
        assert_eq!(&archive[eocd..eocd + 4], &0x0605_4b50u32.to_le_bytes());
        assert_eq!(&archive[eocd + 10..eocd + 12], &1u16.to_le_bytes());
    }

    #[test]
    fn crc32_matches_known_vector() {
        // "123456789" -> 0xCBF43926 (IEEE 802.3 check value)
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn missing_html_is_a_validation_error() {
        let req = DeployRequest { html: String::new(), project_name: None, token: None };
        assert!(matches!(
            Deployer::require_html(&req),
            Err(ForgeError::Validation(_))
        ));
    }

    #[test]
    fn body_token_wins_over_fallback() {
        let tok = Deployer::resolve_token(
            &Some("body".into()),
            &Some("env".into()),
            "missing",
        )
        .unwrap();
        assert_eq!(tok, "body");
        let tok =
            Deployer::resolve_token(&None, &Some("env".into()), "missing").unwrap();
        assert_eq!(tok, "env");
        assert!(Deployer::resolve_token(&None, &None, "missing").is_err());
    }

    #[tokio::test]
    async fn github_deploy_builds_githack_view_url() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gists"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "abc123",
                "html_url": "https://gist.github.com/abc123",
                "files": {
                    "my-site.html": { "raw_url": "https://gist.githubusercontent.com/raw/x" }
                }
            })))
            .mount(&server)
            .await;

        let cfg = Config { github_api_base: server.uri(), ..Config::default() };
        let deployer = Deployer::new(&cfg);
        let out = deployer
            .github(&DeployRequest {
                html: "<html></html>".into(),
                project_name: Some("My Site".into()),
                token: Some("t".into()),
            })
            .await
            .unwrap();
        assert_eq!(out.gist_id, "abc123");
        assert_eq!(out.url, "https://gist.githack.com/anonymous/abc123/raw/my-site.html");
        assert_eq!(out.raw_url, "https://gist.githubusercontent.com/raw/x");
    }
}
