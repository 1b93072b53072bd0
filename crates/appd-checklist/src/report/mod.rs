use serde_json::Value;
use tracing::info;

use crate::{config::AppConfig, error::ApiError};

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct ReportResponse {
    pub report: String,
}

/// Wraps the snapshot in the fixed checklist instructions for one client.
pub fn build_prompt(client_name: &str, data: &Value) -> String {
    let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
    format!(
        r#"Aqui estão os dados brutos do AppDynamics do cliente "{client}":
{pretty}

Por favor, gere o checklist diário seguindo rigorosamente as instruções do prompt abaixo:

--- INSTRUÇÕES DO PROMPT ---
Você é um especialista em Observabilidade/SRE, com foco em AppDynamics.
Preciso que você gere diariamente um checklist/resumo para envio via chat (Teams) sobre a saúde do ambiente do cliente, usando sempre a janela das últimas 24 horas do AppDynamics.

Contexto do cliente:
Nome: {client}
Ferramenta principal de observabilidade: AppDynamics (APM, Servers, Databases).
Objetivo: comunicação rápida, clara e objetiva.

Regras para a saída:
- Formato de mensagem para Teams, texto plano, em blocos curtos e scanáveis.
- Sempre em português.
- Só mencionar o que estiver em WARNING ou CRITICAL.
- REGRA DE OURO: Analise o campo 'healthViolations' com atenção total. Se houver qualquer alerta com status 'OPEN', 'CONTINUE' ou que tenha ocorrido nas últimas 24h, ele DEVE ser reportado.
- Se o alerta for de 'Memory Usage', 'CPU Usage' ou 'Disk Usage' e afetar um servidor, coloque-o obrigatoriamente no Bloco 3 (Infraestrutura).
- Use os detalhes da violação (como 'description' ou 'name') para descrever o problema.
- Se houver alertas críticos abertos, o 'Status Geral' deve refletir isso.
- Não listar aplicações/servidores/DB em OK.
- DESCONSIDERAR APLICAÇÃO OU SERVIDOR QUE CONTENHA HML.

Estrutura fixa da mensagem:
Linha 1 – Título: "[{client}] – Checklist Diário AppDynamics – DD/MM/AAAA (últimas 24h)"
Bloco 1 – Status Geral: 2 a 3 linhas sobre riscos principais.
Bloco 2 – Aplicações (somente Warning/Crítico): 🟠 para Warning, 🔴 para Crítico. Nome, Volume, RT, Erro%, e comentário de negócio.
Bloco 3 – Infraestrutura (somente servidores em Crítico): Nome, %disco, %CPU, %memória, comentário. Se não tiver as porcentagens exatas, descreva o alerta.
Bloco 4 – Banco de Dados (somente DB em Crítico): Nome, CPU, memória, waits, comentário.
Bloco 5 – Ações Recomendadas (curto prazo): 3 a 5 bullets objetivos baseados nos problemas reais.
--- FIM DAS INSTRUÇÕES ---
"#,
        client = client_name.trim(),
    )
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn from_config(http: reqwest::Client, cfg: &AppConfig) -> Result<Self, ApiError> {
        let api_key = cfg
            .gemini_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ApiError::Config("GEMINI_API_KEY not set".into()))?;

        Ok(Self {
            http,
            api_key,
            model: cfg.gemini_model.clone(),
            base_url: cfg.gemini_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("failed to reach Gemini API: {e}")))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ApiError::Upstream(format!(
                "Gemini API error ({status}): {text}"
            )));
        }

        let json: Value = serde_json::from_str(&text)
            .map_err(|e| ApiError::Upstream(format!("invalid Gemini response: {e}")))?;
        let report = candidate_text(&json);
        if report.trim().is_empty() {
            return Err(ApiError::Upstream("model returned no text".into()));
        }

        info!(model = %self.model, chars = report.len(), "report generated");
        Ok(report)
    }
}

fn candidate_text(json: &Value) -> String {
    json["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<String>()
        })
        .unwrap_or_default()
}
