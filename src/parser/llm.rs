//! `llm_model`, `llm_intent`, and `llm_config` declarations. See spec.md
//! §3 "LLM model / intent / config".

use super::Parser;
use crate::error::DazzleResult;
use crate::ir::llm::{LlmConfig, LlmIntent, LlmModel, PiiAction, PiiPolicy, RetryPolicy};
use crate::lexer::{Keyword, TokenKind};
use std::collections::BTreeMap;
use std::time::Duration;

enum LlmModelItem {
    Provider(String),
    ModelId(String),
    Tier(String),
    MaxTokens(u32),
}

enum LlmIntentItem {
    Model(String, crate::location::Location),
    Prompt(String),
    OutputSchema(String),
    Timeout(Duration),
    Retry(RetryPolicy),
    Pii(PiiPolicy),
}

enum LlmConfigItem {
    DefaultModel(String),
    ArtifactStore(String),
    Logging(bool),
    RateLimits(BTreeMap<String, u32>),
}

impl Parser {
    pub(crate) fn parse_llm_model(&mut self) -> DazzleResult<LlmModel> {
        let loc = self.expect_keyword(Keyword::LlmModel)?;
        let (name, _) = self.ident_like()?;
        self.expect_colon()?;

        let mut provider = None;
        let mut model_id = None;
        let mut tier = None;
        let mut max_tokens = None;

        for item in self.parse_block(Self::parse_llm_model_item)? {
            match item {
                LlmModelItem::Provider(v) => provider = Some(v),
                LlmModelItem::ModelId(v) => model_id = Some(v),
                LlmModelItem::Tier(v) => tier = Some(v),
                LlmModelItem::MaxTokens(v) => max_tokens = Some(v),
            }
        }

        Ok(LlmModel {
            name,
            provider: provider.ok_or_else(|| self.expected("`provider: NAME`"))?,
            model_id: model_id.ok_or_else(|| self.expected("`model_id: \"...\"`"))?,
            tier: tier.ok_or_else(|| self.expected("`tier: NAME`"))?,
            max_tokens,
            location: loc,
        })
    }

    fn parse_llm_model_item(&mut self) -> DazzleResult<LlmModelItem> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Provider) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.ident_like()?;
                self.end_of_line()?;
                Ok(LlmModelItem::Provider(v))
            }
            TokenKind::Keyword(Keyword::ModelId) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(LlmModelItem::ModelId(v))
            }
            TokenKind::Keyword(Keyword::Tier) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.ident_like()?;
                self.end_of_line()?;
                Ok(LlmModelItem::Tier(v))
            }
            TokenKind::Keyword(Keyword::MaxTokens) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.int_lit()?;
                self.end_of_line()?;
                Ok(LlmModelItem::MaxTokens(v as u32))
            }
            _ => Err(self.expected("`provider`, `model_id`, `tier`, or `max_tokens`")),
        }
    }

    pub(crate) fn parse_llm_intent(&mut self) -> DazzleResult<LlmIntent> {
        let loc = self.expect_keyword(Keyword::LlmIntent)?;
        let (name, _) = self.ident_like()?;
        self.expect_colon()?;

        let mut model = None;
        let mut model_location = None;
        let mut prompt = None;
        let mut output_schema = None;
        let mut timeout = Duration::from_secs(30);
        let mut retry = RetryPolicy {
            max_attempts: 1,
            backoff: "fixed".to_string(),
            delays: Vec::new(),
        };
        let mut pii = PiiPolicy {
            scan: false,
            action: PiiAction::Warn,
        };

        for item in self.parse_block(Self::parse_llm_intent_item)? {
            match item {
                LlmIntentItem::Model(m, l) => {
                    model = Some(m);
                    model_location = Some(l);
                }
                LlmIntentItem::Prompt(p) => prompt = Some(p),
                LlmIntentItem::OutputSchema(s) => output_schema = Some(s),
                LlmIntentItem::Timeout(d) => timeout = d,
                LlmIntentItem::Retry(r) => retry = r,
                LlmIntentItem::Pii(p) => pii = p,
            }
        }

        Ok(LlmIntent {
            name,
            model,
            model_location,
            prompt: prompt.ok_or_else(|| self.expected("`prompt: \"...\"`"))?,
            output_schema,
            timeout,
            retry,
            pii,
            location: loc,
        })
    }

    fn parse_llm_intent_item(&mut self) -> DazzleResult<LlmIntentItem> {
        match self.peek().clone() {
            TokenKind::Ident(s) if s == "model" => {
                self.advance();
                self.expect_colon()?;
                let (v, loc) = self.ident_like()?;
                self.end_of_line()?;
                Ok(LlmIntentItem::Model(v, loc))
            }
            TokenKind::Keyword(Keyword::Prompt) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(LlmIntentItem::Prompt(v))
            }
            TokenKind::Keyword(Keyword::OutputSchema) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(LlmIntentItem::OutputSchema(v))
            }
            TokenKind::Keyword(Keyword::Timeout) => {
                self.advance();
                self.expect_colon()?;
                let (n, _) = self.int_lit()?;
                self.end_of_line()?;
                Ok(LlmIntentItem::Timeout(Duration::from_secs(n.max(0) as u64)))
            }
            TokenKind::Keyword(Keyword::Retry) => {
                self.advance();
                self.expect_colon()?;
                Ok(LlmIntentItem::Retry(self.parse_retry_policy()?))
            }
            TokenKind::Keyword(Keyword::Pii) => {
                self.advance();
                self.expect_colon()?;
                Ok(LlmIntentItem::Pii(self.parse_pii_policy()?))
            }
            _ => Err(self.expected(
                "`model`, `prompt`, `output_schema`, `timeout`, `retry`, or `pii`",
            )),
        }
    }

    fn parse_retry_policy(&mut self) -> DazzleResult<RetryPolicy> {
        let mut max_attempts = 1u32;
        let mut backoff = "fixed".to_string();
        let mut delays = Vec::new();
        self.parse_block(|p| {
            match p.peek().clone() {
                TokenKind::Keyword(Keyword::MaxAttempts) => {
                    p.advance();
                    p.expect_colon()?;
                    let (n, _) = p.int_lit()?;
                    max_attempts = n.max(0) as u32;
                }
                TokenKind::Keyword(Keyword::Backoff) => {
                    p.advance();
                    p.expect_colon()?;
                    let (v, _) = p.ident_like()?;
                    backoff = v;
                }
                TokenKind::Keyword(Keyword::Delays) => {
                    p.advance();
                    p.expect_colon()?;
                    if !matches!(p.peek(), TokenKind::LBrack) {
                        return Err(p.expected("`[`"));
                    }
                    p.advance();
                    if !matches!(p.peek(), TokenKind::RBrack) {
                        loop {
                            let (n, _) = p.int_lit()?;
                            delays.push(Duration::from_secs(n.max(0) as u64));
                            if matches!(p.peek(), TokenKind::Comma) {
                                p.advance();
                                continue;
                            }
                            break;
                        }
                    }
                    if !matches!(p.peek(), TokenKind::RBrack) {
                        return Err(p.expected("`]`"));
                    }
                    p.advance();
                }
                _ => return Err(p.expected("`max_attempts`, `backoff`, or `delays`")),
            }
            p.end_of_line()?;
            Ok(())
        })?;
        Ok(RetryPolicy {
            max_attempts,
            backoff,
            delays,
        })
    }

    fn parse_pii_policy(&mut self) -> DazzleResult<PiiPolicy> {
        let mut scan = false;
        let mut action = PiiAction::Warn;
        self.parse_block(|p| {
            match p.peek().clone() {
                TokenKind::Keyword(Keyword::Scan) => {
                    p.advance();
                    p.expect_colon()?;
                    scan = match p.peek().clone() {
                        TokenKind::Keyword(Keyword::True) => {
                            p.advance();
                            true
                        }
                        TokenKind::Keyword(Keyword::False) => {
                            p.advance();
                            false
                        }
                        _ => return Err(p.expected("`true` or `false`")),
                    };
                }
                TokenKind::Keyword(Keyword::Action) => {
                    p.advance();
                    p.expect_colon()?;
                    let (v, loc) = p.ident_like()?;
                    action = match v.as_str() {
                        "redact" => PiiAction::Redact,
                        "warn" => PiiAction::Warn,
                        _ => return Err(p.expected_with_hint_at("`redact` or `warn`", loc)),
                    };
                }
                _ => return Err(p.expected("`scan` or `action`")),
            }
            p.end_of_line()?;
            Ok(())
        })?;
        Ok(PiiPolicy { scan, action })
    }

    pub(crate) fn parse_llm_config(&mut self) -> DazzleResult<LlmConfig> {
        let loc = self.expect_keyword(Keyword::LlmConfig)?;
        self.expect_colon()?;

        let mut default_model = None;
        let mut artifact_store = None;
        let mut logging_enabled = false;
        let mut rate_limits = BTreeMap::new();

        for item in self.parse_block(Self::parse_llm_config_item)? {
            match item {
                LlmConfigItem::DefaultModel(v) => default_model = Some(v),
                LlmConfigItem::ArtifactStore(v) => artifact_store = Some(v),
                LlmConfigItem::Logging(v) => logging_enabled = v,
                LlmConfigItem::RateLimits(v) => rate_limits.extend(v),
            }
        }

        Ok(LlmConfig {
            default_model,
            artifact_store,
            logging_enabled,
            rate_limits,
            location: loc,
        })
    }

    fn parse_llm_config_item(&mut self) -> DazzleResult<LlmConfigItem> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::DefaultModel) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.ident_like()?;
                self.end_of_line()?;
                Ok(LlmConfigItem::DefaultModel(v))
            }
            TokenKind::Keyword(Keyword::ArtifactStore) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(LlmConfigItem::ArtifactStore(v))
            }
            TokenKind::Keyword(Keyword::Logging) => {
                self.advance();
                self.expect_colon()?;
                let enabled = match self.peek().clone() {
                    TokenKind::Keyword(Keyword::True) => {
                        self.advance();
                        true
                    }
                    TokenKind::Keyword(Keyword::False) => {
                        self.advance();
                        false
                    }
                    _ => return Err(self.expected("`true` or `false`")),
                };
                self.end_of_line()?;
                Ok(LlmConfigItem::Logging(enabled))
            }
            TokenKind::Keyword(Keyword::RateLimits) => {
                self.advance();
                self.expect_colon()?;
                let mut map = BTreeMap::new();
                self.parse_block(|p| {
                    let (model, _) = p.ident_like()?;
                    p.expect_colon()?;
                    let (rpm, _) = p.int_lit()?;
                    p.end_of_line()?;
                    map.insert(model, rpm.max(0) as u32);
                    Ok(())
                })?;
                Ok(LlmConfigItem::RateLimits(map))
            }
            _ => Err(self.expected("`default_model`, `artifact_store`, `logging`, or `rate_limits`")),
        }
    }
}
