//! AI answer generation for student questions.
//!
//! Questions are classified into a subject category by keyword matching, the
//! knowledge base is searched for related entries to use as context, and an
//! answer is generated by OpenAI or Anthropic when an API key is configured.
//! Without a key (or when both providers fail) a category-specific template
//! answer is returned instead, so the endpoint never hard-fails on provider
//! availability.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AppConfig;

pub const MATH_CATEGORY: &str = "수학";
pub const SCIENCE_CATEGORY: &str = "과학";
pub const PROGRAMMING_CATEGORY: &str = "프로그래밍";
pub const KOREAN_CATEGORY: &str = "국어";
pub const ENGLISH_CATEGORY: &str = "영어";
pub const GENERAL_CATEGORY: &str = "일반";

/// Default tag attached to AI-generated entries saved into the knowledge base.
pub const AI_GENERATED_TAG: &str = "AI생성";

const MATH_KEYWORDS: &[&str] = &[
    "수학", "계산", "공식", "방정식", "함수", "미분", "적분", "기하", "대수",
];
const SCIENCE_KEYWORDS: &[&str] = &["과학", "물리", "화학", "생물", "실험", "원리", "법칙"];
const PROGRAMMING_KEYWORDS: &[&str] = &[
    "프로그래밍",
    "코딩",
    "파이썬",
    "자바스크립트",
    "알고리즘",
    "데이터베이스",
];
const KOREAN_KEYWORDS: &[&str] = &["국어", "문법", "맞춤법", "문학", "작문"];
const ENGLISH_KEYWORDS: &[&str] = &["영어", "단어", "독해", "회화"];

/// A knowledge-base entry condensed into prompt context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaContext {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAnswer {
    pub answer: String,
    pub confidence: f32,
    pub category: String,
    pub sources: Vec<String>,
    pub reasoning: String,
}

pub struct AiService {
    client: reqwest::Client,
    openai_api_key: Option<String>,
    anthropic_api_key: Option<String>,
}

impl AiService {
    pub fn from_config(config: &AppConfig) -> Self {
        let keys = config.api_keys.as_ref();
        Self {
            client: reqwest::Client::new(),
            openai_api_key: keys.and_then(|k| k.openai_api_key.clone()),
            anthropic_api_key: keys.and_then(|k| k.anthropic_api_key.clone()),
        }
    }

    /// Keyword-based subject classification, defaulting to the general
    /// category when no subject keyword appears.
    pub fn classify_category(question: &str) -> &'static str {
        let question = question.to_lowercase();
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| question.contains(k));

        if contains_any(MATH_KEYWORDS) {
            MATH_CATEGORY
        } else if contains_any(SCIENCE_KEYWORDS) {
            SCIENCE_CATEGORY
        } else if contains_any(PROGRAMMING_KEYWORDS) {
            PROGRAMMING_CATEGORY
        } else if contains_any(KOREAN_KEYWORDS) {
            KOREAN_CATEGORY
        } else if contains_any(ENGLISH_KEYWORDS) {
            ENGLISH_CATEGORY
        } else {
            GENERAL_CATEGORY
        }
    }

    pub async fn generate_answer(
        &self,
        question: &str,
        category: &str,
        context: &[QaContext],
    ) -> AiAnswer {
        let sources: Vec<String> = context.iter().map(|c| c.question.clone()).collect();
        let prompt = build_prompt(question, category, context);

        if let Some(key) = &self.openai_api_key {
            match self.call_openai(key, &prompt, category, &sources).await {
                Ok(answer) => return answer,
                Err(e) => tracing::warn!("OpenAI request failed, trying fallback: {e}"),
            }
        }

        if let Some(key) = &self.anthropic_api_key {
            match self.call_anthropic(key, &prompt, category, &sources).await {
                Ok(answer) => return answer,
                Err(e) => tracing::warn!("Anthropic request failed, trying fallback: {e}"),
            }
        }

        fallback_answer(category, &sources)
    }

    async fn call_openai(
        &self,
        api_key: &str,
        prompt: &str,
        category: &str,
        sources: &[String],
    ) -> Result<AiAnswer> {
        let body = serde_json::json!({
            "model": "gpt-4",
            "messages": [
                {
                    "role": "system",
                    "content": "당신은 전문적인 교육 도우미입니다. 정확하고 이해하기 쉬운 답변을 제공합니다."
                },
                { "role": "user", "content": prompt }
            ],
            "max_tokens": 1000,
            "temperature": 0.7
        });

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(api_key)
            .json(&body)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .context("OpenAI request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("OpenAI API error: {}", response.status()));
        }

        let result: serde_json::Value = response.json().await?;
        let answer = result["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow!("Unexpected OpenAI response shape"))?
            .to_string();

        Ok(AiAnswer {
            answer,
            confidence: 0.9,
            category: category.to_string(),
            sources: sources.to_vec(),
            reasoning: "OpenAI GPT-4를 사용한 답변".to_string(),
        })
    }

    async fn call_anthropic(
        &self,
        api_key: &str,
        prompt: &str,
        category: &str,
        sources: &[String],
    ) -> Result<AiAnswer> {
        let body = serde_json::json!({
            "model": "claude-3-5-sonnet-20241022",
            "max_tokens": 1000,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .context("Anthropic request failed")?;

        if !response.status().is_success() {
            return Err(anyhow!("Anthropic API error: {}", response.status()));
        }

        let result: serde_json::Value = response.json().await?;
        let answer = result["content"][0]["text"]
            .as_str()
            .ok_or_else(|| anyhow!("Unexpected Anthropic response shape"))?
            .to_string();

        Ok(AiAnswer {
            answer,
            confidence: 0.9,
            category: category.to_string(),
            sources: sources.to_vec(),
            reasoning: "Claude AI를 사용한 답변".to_string(),
        })
    }
}

fn build_prompt(question: &str, category: &str, context: &[QaContext]) -> String {
    let mut context_text = String::new();
    if !context.is_empty() {
        context_text.push_str("\n\n관련 정보:\n");
        for (i, item) in context.iter().enumerate() {
            context_text.push_str(&format!(
                "{}. Q: {}\n   A: {}\n",
                i + 1,
                item.question,
                item.answer
            ));
        }
    }

    let base_prompt = format!(
        "질문: {question}\n카테고리: {category}\n{context_text}\n위 정보를 참고하여 질문에 대한 전문적이고 정확한 답변을 한국어로 작성해주세요."
    );

    let guidelines = match category {
        MATH_CATEGORY => {
            "\n\n수학 답변 가이드라인:\n- 공식이나 수식이 포함된 경우 LaTeX 형식으로 작성 (예: $x^2 + y^2 = r^2$)\n- 단계별로 풀이 과정을 명확히 설명\n- 필요시 그래프나 도형 설명 포함\n- 결과 검증 방법 제시"
        }
        SCIENCE_CATEGORY => {
            "\n\n과학 답변 가이드라인:\n- 과학적 원리와 법칙을 명확히 설명\n- 실험이나 관찰 사례 포함\n- 관련 공식이나 화학식 제시\n- 실생활 응용 사례 언급"
        }
        PROGRAMMING_CATEGORY => {
            "\n\n프로그래밍 답변 가이드라인:\n- 코드 예시를 포함하여 설명\n- 각 단계별 주석과 설명\n- 실행 결과나 출력 예시\n- 최적화나 대안 방법 제시"
        }
        _ => "",
    };

    format!("{base_prompt}{guidelines}")
}

/// Template answer used when no AI provider is reachable.
fn fallback_answer(category: &str, sources: &[String]) -> AiAnswer {
    let base = match category {
        MATH_CATEGORY => {
            "이 수학 문제를 해결하기 위해서는 단계별로 접근해보겠습니다. 주어진 조건을 정리하고, 관련 공식을 적용해보세요. 구체적인 계산 과정이 필요하시면 더 자세한 정보를 제공해주세요."
        }
        SCIENCE_CATEGORY => {
            "이 과학 질문에 답하기 위해서는 관련 원리와 법칙을 이해하는 것이 중요합니다. 실험적 관찰이나 이론적 배경을 함께 고려해보시기 바랍니다."
        }
        PROGRAMMING_CATEGORY => {
            "이 프로그래밍 문제를 해결하기 위해서는 알고리즘을 단계별로 설계하고 구현해야 합니다. 코드 예시와 함께 설명드리겠습니다."
        }
        _ => {
            "질문에 대한 답변을 위해 관련 정보를 수집하고 분석해보겠습니다. 더 구체적인 내용이나 맥락을 제공해주시면 더 정확한 답변을 드릴 수 있습니다."
        }
    };

    let mut answer = base.to_string();
    if !sources.is_empty() {
        answer.push_str("\n\n참고한 관련 질문들:\n");
        for source in sources.iter().take(3) {
            answer.push_str(&format!("- {source}\n"));
        }
    }

    AiAnswer {
        answer,
        confidence: 0.6,
        category: category.to_string(),
        sources: sources.to_vec(),
        reasoning: "기본 템플릿 기반 답변 (AI 서비스 미사용)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_category_by_keywords() {
        assert_eq!(
            AiService::classify_category("이차방정식 공식이 뭐야?"),
            MATH_CATEGORY
        );
        assert_eq!(
            AiService::classify_category("화학 실험 보고서 쓰는 법"),
            SCIENCE_CATEGORY
        );
        assert_eq!(
            AiService::classify_category("파이썬 알고리즘 질문입니다"),
            PROGRAMMING_CATEGORY
        );
        assert_eq!(
            AiService::classify_category("맞춤법 검사 부탁해요"),
            KOREAN_CATEGORY
        );
        assert_eq!(
            AiService::classify_category("영어 독해 잘하는 법"),
            ENGLISH_CATEGORY
        );
        assert_eq!(
            AiService::classify_category("What is the capital of France?"),
            GENERAL_CATEGORY
        );
    }

    #[test]
    fn test_fallback_answer_lists_sources() {
        let sources = vec!["What is Python?".to_string(), "What is a loop?".to_string()];
        let answer = fallback_answer(PROGRAMMING_CATEGORY, &sources);

        assert_eq!(answer.category, PROGRAMMING_CATEGORY);
        assert!(answer.confidence < 0.9);
        assert!(answer.answer.contains("What is Python?"));
        assert_eq!(answer.sources.len(), 2);
    }

    #[test]
    fn test_prompt_includes_context_and_guidelines() {
        let context = vec![QaContext {
            question: "미분이란?".to_string(),
            answer: "변화율입니다".to_string(),
            category: MATH_CATEGORY.to_string(),
            tags: vec![],
        }];

        let prompt = build_prompt("적분이란?", MATH_CATEGORY, &context);
        assert!(prompt.contains("적분이란?"));
        assert!(prompt.contains("미분이란?"));
        assert!(prompt.contains("수학 답변 가이드라인"));

        let no_context = build_prompt("hi", GENERAL_CATEGORY, &[]);
        assert!(!no_context.contains("관련 정보"));
    }
}
