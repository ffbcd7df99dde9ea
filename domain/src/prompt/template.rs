//! Prompt templates for the hearing
//!
//! Default system prompts per role plus the templated messages the
//! orchestrator injects (opening, team seed, supplements, judge directives).

use crate::case::{ArticleId, Case};
use crate::court::{Role, Side, TeamSeat};
use std::collections::BTreeSet;

/// Templates for generating prompts at each stage of a hearing
pub struct PromptTemplate;

impl PromptTemplate {
    /// Built-in system prompt for `role`.
    pub fn default_system(role: Role) -> String {
        match role {
            Role::Judge => Self::judge_system().to_string(),
            Role::PlaintiffDelegate | Role::DefendantDelegate => {
                let side = role.side().unwrap_or(Side::Plaintiff);
                format!(
                    "你是{}团队在法庭上的代表。你只负责把团队内部讨论形成的统一意见提交给法庭，不单独发表个人观点。",
                    side.label()
                )
            }
            _ => {
                let side = role.side().unwrap_or(Side::Plaintiff);
                let seat = TeamSeat::ROTATION
                    .into_iter()
                    .find(|seat| Role::specialist(side, *seat) == role)
                    .unwrap_or(TeamSeat::LeadCounsel);
                Self::specialist_system(side, seat)
            }
        }
    }

    fn judge_system() -> &'static str {
        r#"你是本次刑事案件模拟庭审的审判长。
你的职责：
1. 主持庭审，引导原告与被告围绕案件事实、证据和法律适用展开辩论；
2. 保持中立，针对双方陈述中的争议焦点进行追问；
3. 在辩论充分后作出判决，判决须援引具体的刑法条文。
发言应简洁、专业，不要替任何一方陈述观点。"#
    }

    fn specialist_system(side: Side, seat: TeamSeat) -> String {
        let stance = match side {
            Side::Plaintiff => "指控被告人的犯罪事实并争取依法定罪量刑",
            Side::Defendant => "维护被告人的合法权益，争取无罪、罪轻或从轻处罚",
        };
        let duty = match seat {
            TeamSeat::EvidenceSpecialist => {
                "你是团队的证据专家，负责梳理和审查案件证据，指出证据的证明力、关联性以及对方证据中的漏洞。"
            }
            TeamSeat::LegalResearcher => {
                "你是团队的法律研究员，负责检索并分析可适用的刑法条文和司法解释，说明其构成要件与量刑幅度。"
            }
            TeamSeat::LeadCounsel => {
                "你是团队的首席律师，负责在讨论结束时综合证据专家和法律研究员的意见，形成团队统一、清晰、有力的最终回复。"
            }
        };
        format!("你属于{}团队，团队目标是{}。\n{}", side.label(), stance, duty)
    }

    /// The judge's opening statement (always the first outer message).
    pub fn opening(case: &Case, retrieved: &BTreeSet<ArticleId>) -> String {
        let retrieved = retrieved
            .iter()
            .map(ArticleId::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "法庭辩论现在开始。\n【案件编号】: {}\n【案件ID】: {}\n【案情简介】: {}\n\n\
我作为审判长将主导本次辩论。原告团队，请提出你的开场陈述，陈述你方的诉求和证据。\
经检索相似案例，参考以往判决结果，本案可援引的相关刑法条文包括：[{}]。",
            case.index, case.case_id, case.description, retrieved
        )
    }

    /// Seed message that opens a team's inner deliberation.
    pub fn team_seed(description: &str, court_message: &str) -> String {
        format!(
            "案件描述: {}\n\n法庭传来消息：{}\n\n\
请团队成员（首席律师、证据专家、法律研究员）仔细分析法庭消息。\
围绕案件描述和法庭消息进行充分讨论，并生成一个针对法庭消息的统一、清晰、有力的回复。\
首席律师需要在讨论结束后，对团队讨论的结果进行总结，并确保最终的回复是原创的，\
并且内容与法庭消息或案件描述有显著区别。",
            description, court_message
        )
    }

    /// Forced supplement turn carrying a side's additional evidence.
    pub fn supplement(side: Side, evidence: &[String]) -> String {
        format!("{}补充证据集合：{}", side.label(), evidence.join("；"))
    }

    /// Directive for a judge turn during the debate.
    pub fn commentary_directive() -> &'static str {
        "请审判长根据双方目前的陈述归纳争议焦点，并就尚未查清的事实或法律适用问题向双方提问。本轮不要作出判决。"
    }

    /// Directive for the judge's final turn.
    pub fn final_judgment_directive() -> &'static str {
        r#"辩论已经结束，请审判长作出判决。
请先简要说明判决理由，然后输出一个 JSON 对象，格式如下：
{"Law Articles": [适用的刑法条文编号], "Crime Type": ["罪名"], "Sentence": "刑期", "Fine": "罚金"}
JSON 中只能包含这四个字段。最后以“宣判完毕”结束发言。"#
    }

    /// Context block built from knowledge-memory hits.
    pub fn memory_context(snippets: &[String]) -> String {
        let mut prompt = String::from("以下是从知识库中检索到的相关资料，仅供参考：\n");
        for (i, snippet) in snippets.iter().enumerate() {
            prompt.push_str(&format!("\n[{}] {}\n", i + 1, snippet));
        }
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::GroundTruth;

    fn case() -> Case {
        Case {
            index: 12,
            case_id: "C-12".to_string(),
            description: "被告人深夜入室盗窃".to_string(),
            truth: GroundTruth::default(),
            plaintiff_evidence: vec![],
            defendant_evidence: vec![],
        }
    }

    #[test]
    fn test_opening_lists_case_and_candidates() {
        let retrieved = BTreeSet::from([ArticleId(67), ArticleId(264)]);
        let opening = PromptTemplate::opening(&case(), &retrieved);
        assert!(opening.starts_with("法庭辩论现在开始。"));
        assert!(opening.contains("【案件编号】: 12"));
        assert!(opening.contains("【案件ID】: C-12"));
        assert!(opening.contains("[67, 264]"));
    }

    #[test]
    fn test_seed_carries_court_message() {
        let seed = PromptTemplate::team_seed("案情", "请原告陈述");
        assert!(seed.starts_with("案件描述: 案情"));
        assert!(seed.contains("法庭传来消息：请原告陈述"));
    }

    #[test]
    fn test_supplement_is_side_labelled() {
        let text = PromptTemplate::supplement(Side::Defendant, &["收据".into(), "证言".into()]);
        assert_eq!(text, "被告补充证据集合：收据；证言");
    }

    #[test]
    fn test_every_role_has_a_default() {
        for role in Role::ALL {
            assert!(!PromptTemplate::default_system(role).is_empty());
        }
        assert!(PromptTemplate::default_system(Role::DefendantLeadCounsel).contains("被告"));
    }

    #[test]
    fn test_final_directive_names_scored_keys() {
        let directive = PromptTemplate::final_judgment_directive();
        assert!(directive.contains("\"Law Articles\""));
        assert!(directive.contains("\"Crime Type\""));
    }
}
