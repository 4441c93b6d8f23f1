use std::{str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use strum::AsRefStr;
use tracing::{debug, warn};

use super::{
    skills::{match_hard_skills, match_soft_skills, skills_overlap, SkillCoverage},
    weights::{
        is_leader_title, FitWeights, SeniorityPenalties, DEFAULT_TOP_N, LEADER_KEYWORDS,
        RANKING_SENIORITY_CUTOFF, ROLE_FIT_WEIGHTS, SENIORITY_PENALTIES,
    },
};
use crate::{
    compatibility::Compatibility, error::ConfigError, seniority::seniority_gap, Person, PersonId,
    Role,
};

#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub weights: FitWeights,
    pub penalties: SeniorityPenalties,
    /// ランキングで許容する上振れ段階数
    pub ranking_cutoff: i8,
    pub top_n: usize,
    pub leader_keywords: &'static [&'static str],
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ROLE_FIT_WEIGHTS,
            penalties: SENIORITY_PENALTIES,
            ranking_cutoff: RANKING_SENIORITY_CUTOFF,
            top_n: DEFAULT_TOP_N,
            leader_keywords: LEADER_KEYWORDS,
        }
    }
}

impl ScoringConfig {
    /// 環境変数から読み込み（未設定・不正値は既定値、検証失敗時は既定値へ戻す）
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let config = Self {
            weights: FitWeights {
                skills: env_or("ORGFIT_SKILL_WEIGHT", defaults.weights.skills),
                seniority: env_or("ORGFIT_SENIORITY_WEIGHT", defaults.weights.seniority),
            },
            penalties: SeniorityPenalties {
                over_per_level: env_or(
                    "ORGFIT_OVER_QUALIFIED_PENALTY",
                    defaults.penalties.over_per_level,
                ),
                under_per_level: env_or(
                    "ORGFIT_UNDER_QUALIFIED_PENALTY",
                    defaults.penalties.under_per_level,
                ),
            },
            ranking_cutoff: env_or("ORGFIT_RANKING_CUTOFF", defaults.ranking_cutoff),
            top_n: env_or("ORGFIT_RANKING_TOP_N", defaults.top_n),
            leader_keywords: defaults.leader_keywords,
        };

        match config.validate() {
            Ok(()) => config,
            Err(err) => {
                warn!(error = %err, "invalid scoring config from env; using defaults");
                defaults
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let FitWeights { skills, seniority } = self.weights;
        if !skills.is_finite() || !seniority.is_finite() {
            return Err(ConfigError::NonFiniteWeight { skills, seniority });
        }
        if skills < 0.0 || seniority < 0.0 {
            return Err(ConfigError::NegativeWeight { skills, seniority });
        }
        if (self.weights.sum() - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSum(self.weights.sum()));
        }
        let SeniorityPenalties {
            over_per_level,
            under_per_level,
        } = self.penalties;
        if !(over_per_level.is_finite() && over_per_level >= 0.0)
            || !(under_per_level.is_finite() && under_per_level >= 0.0)
        {
            return Err(ConfigError::InvalidPenalty {
                over: over_per_level,
                under: under_per_level,
            });
        }
        if self.ranking_cutoff < 0 {
            return Err(ConfigError::NegativeCutoff(self.ranking_cutoff));
        }
        if self.top_n == 0 {
            return Err(ConfigError::EmptyTopN);
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SeniorityMatch {
    Match,
    /// オーバースペック
    Above,
    /// アンダースペック
    Below,
    /// 要求・評価のどちらかが未設定
    Unknown,
}

/// ロールフィットの内訳（配属済み評価と候補者ランキングで共通）
#[derive(Debug, Clone, PartialEq)]
pub struct RoleFitBreakdown {
    pub skill_score: f64,
    pub seniority_score: f64,
    pub role_fit_score: u8,
    pub seniority_match: SeniorityMatch,
    pub seniority_gap: Option<i8>,
    pub soft_skills: SkillCoverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub role_fit_score: u8,
    /// None = 算出不能（コード未設定 / 上長なし）
    pub manager_fit_score: Option<u8>,
    pub culture_fit_score: u8,
    pub is_leader: bool,
}

impl Metrics {
    /// 空席・募集中ポジション
    pub fn vacant() -> Self {
        Self {
            role_fit_score: 0,
            manager_fit_score: None,
            culture_fit_score: 0,
            is_leader: false,
        }
    }
}

/// 上長ごとの相性
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerFit {
    pub manager_id: PersonId,
    pub manager_name: String,
    /// None = どちらかのプロファイルコードが未設定
    pub score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailedMetrics {
    pub metrics: Metrics,
    pub matched_soft_skills: Vec<String>,
    pub missing_soft_skills: Vec<String>,
    pub missing_mandatory_skills: Vec<String>,
    pub matched_hard_skills: Vec<String>,
    pub missing_hard_skills: Vec<String>,
    pub seniority_match: SeniorityMatch,
    pub manager_fits: Vec<ManagerFit>,
    pub matched_culture_values: Vec<String>,
}

impl DetailedMetrics {
    fn vacant() -> Self {
        Self {
            metrics: Metrics::vacant(),
            matched_soft_skills: vec![],
            missing_soft_skills: vec![],
            missing_mandatory_skills: vec![],
            matched_hard_skills: vec![],
            missing_hard_skills: vec![],
            seniority_match: SeniorityMatch::Unknown,
            manager_fits: vec![],
            matched_culture_values: vec![],
        }
    }
}

/// ロール × 配属者の適合度スコアリング
///
/// 入力スナップショットのみに依存する純粋関数群。状態・キャッシュは持たない。
#[derive(Clone)]
pub struct FitScoringEngine {
    config: ScoringConfig,
    compatibility: Arc<dyn Compatibility>,
}

impl FitScoringEngine {
    pub fn new(config: ScoringConfig, compatibility: Arc<dyn Compatibility>) -> Self {
        Self {
            config,
            compatibility,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// 4指標のみ
    pub fn score(
        &self,
        role: &Role,
        assignee: Option<&Person>,
        company_values: &[String],
        parent_managers: &[Person],
    ) -> Metrics {
        self.detailed_score(role, assignee, company_values, parent_managers)
            .metrics
    }

    /// 4指標 + スキル/シニオリティ/上長/カルチャーの内訳
    pub fn detailed_score(
        &self,
        role: &Role,
        assignee: Option<&Person>,
        company_values: &[String],
        parent_managers: &[Person],
    ) -> DetailedMetrics {
        let Some(person) = assignee.filter(|p| !p.is_vacancy()) else {
            return DetailedMetrics::vacant();
        };

        let fit = self.role_fit(role, person);
        let hard = match_hard_skills(&role.required_hard_skills, &person.hard_skills);
        let manager_fits = self.manager_fits(person, parent_managers);
        let manager_fit_score = self.manager_fit_score(person, parent_managers);
        let (culture_fit_score, matched_culture_values) =
            culture_fit(&person.primary_values, company_values);

        debug!(
            role_id = %role.id,
            person_id = %person.id,
            role_fit = fit.role_fit_score,
            manager_fit = ?manager_fit_score,
            compatibility = self.compatibility.name(),
            culture_fit = culture_fit_score,
            "scored position"
        );

        DetailedMetrics {
            metrics: Metrics {
                role_fit_score: fit.role_fit_score,
                manager_fit_score,
                culture_fit_score,
                is_leader: is_leader_title(&person.job_title, self.config.leader_keywords),
            },
            matched_soft_skills: fit.soft_skills.matched,
            missing_soft_skills: fit.soft_skills.missing,
            missing_mandatory_skills: fit.soft_skills.missing_mandatory,
            matched_hard_skills: hard.matched,
            missing_hard_skills: hard.missing,
            seniority_match: fit.seniority_match,
            manager_fits,
            matched_culture_values,
        }
    }

    /// スキル充足とシニオリティ整合の加重平均
    pub fn role_fit(&self, role: &Role, person: &Person) -> RoleFitBreakdown {
        let soft_skills = match_soft_skills(&role.required_soft_skills, &person.soft_skills);
        let gap = seniority_gap(role.required_seniority, person.seniority_assessment);
        let (seniority_score, seniority_match) = self.seniority_score(gap);

        let weights = self.config.weights;
        let raw = soft_skills.percentage * weights.skills + seniority_score * weights.seniority;

        RoleFitBreakdown {
            skill_score: soft_skills.percentage,
            seniority_score,
            role_fit_score: round_score(raw),
            seniority_match,
            seniority_gap: gap,
            soft_skills,
        }
    }

    /// gap = 実レベル − 要求レベル
    pub fn seniority_score(&self, gap: Option<i8>) -> (f64, SeniorityMatch) {
        let penalties = self.config.penalties;
        match gap {
            None => (100.0, SeniorityMatch::Unknown),
            Some(0) => (100.0, SeniorityMatch::Match),
            Some(diff) if diff > 0 => (
                (100.0 - f64::from(diff) * penalties.over_per_level).max(0.0),
                SeniorityMatch::Above,
            ),
            Some(diff) => (
                (100.0 + f64::from(diff) * penalties.under_per_level).max(0.0),
                SeniorityMatch::Below,
            ),
        }
    }

    fn manager_fit_score(&self, person: &Person, managers: &[Person]) -> Option<u8> {
        let own_code = person.profile_code()?;

        let scores: Vec<f64> = managers
            .iter()
            .filter_map(|m| m.profile_code())
            .map(|code| self.pair_score(own_code, code))
            .collect();

        if scores.is_empty() {
            return None;
        }
        Some(round_score(scores.iter().sum::<f64>() / scores.len() as f64))
    }

    fn manager_fits(&self, person: &Person, managers: &[Person]) -> Vec<ManagerFit> {
        let own_code = person.profile_code();
        managers
            .iter()
            .map(|m| ManagerFit {
                manager_id: m.id.clone(),
                manager_name: m.display_name(),
                score: own_code
                    .zip(m.profile_code())
                    .map(|(a, b)| round_score(self.pair_score(a, b))),
            })
            .collect()
    }

    fn pair_score(&self, a: &str, b: &str) -> f64 {
        let raw = self.compatibility.score(a, b);
        if raw.is_nan() {
            return 0.0;
        }
        raw.clamp(0.0, 100.0)
    }
}

/// 本人の価値観のうち会社の価値観と部分一致する割合
fn culture_fit(values: &[String], company_values: &[String]) -> (u8, Vec<String>) {
    let values: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();

    if values.is_empty() || company_values.is_empty() {
        return (0, vec![]);
    }

    let matched: Vec<String> = values
        .iter()
        .filter(|v| company_values.iter().any(|c| skills_overlap(c, v)))
        .map(|v| v.to_string())
        .collect();

    let score = round_score(100.0 * matched.len() as f64 / values.len() as f64);
    (score.min(100), matched)
}

/// 0〜100 にクランプして四捨五入（x.5 は切り上げ）
pub fn round_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compatibility::LetterOverlapCompatibility, seniority::Seniority, SkillRequirement};

    fn engine() -> FitScoringEngine {
        FitScoringEngine::new(
            ScoringConfig::default(),
            Arc::new(LetterOverlapCompatibility),
        )
    }

    fn base_role() -> Role {
        Role {
            id: "r1".into(),
            title: "Product Manager".into(),
            required_seniority: Some(Seniority::Mid),
            required_soft_skills: vec![
                SkillRequirement::named("Leadership"),
                SkillRequirement::named("Communication"),
            ],
            ..Role::default()
        }
    }

    fn base_person() -> Person {
        Person {
            id: "p1".into(),
            first_name: "Ada".into(),
            last_name: "Moretti".into(),
            job_title: "Product Manager".into(),
            profile_code: Some("INTJ".into()),
            seniority_assessment: Some(Seniority::Senior),
            soft_skills: vec!["leadership".into()],
            ..Person::default()
        }
    }

    fn manager(id: &str, code: Option<&str>) -> Person {
        Person {
            id: id.into(),
            first_name: "Boss".into(),
            last_name: id.into(),
            job_title: "Director".into(),
            profile_code: code.map(Into::into),
            ..Person::default()
        }
    }

    #[test]
    fn over_qualified_single_skill_scores_sixty() {
        let fit = engine().role_fit(&base_role(), &base_person());
        assert_eq!(fit.skill_score, 50.0);
        assert_eq!(fit.seniority_score, 70.0);
        assert_eq!(fit.seniority_match, SeniorityMatch::Above);
        assert_eq!(fit.role_fit_score, 60);
    }

    #[test]
    fn under_qualified_rounds_half_up() {
        let mut person = base_person();
        person.seniority_assessment = Some(Seniority::Junior);

        let fit = engine().role_fit(&base_role(), &person);
        assert_eq!(fit.seniority_score, 85.0);
        assert_eq!(fit.seniority_match, SeniorityMatch::Below);
        assert_eq!(fit.role_fit_score, 68);
    }

    #[test]
    fn half_point_boundaries_round_up() {
        assert_eq!(round_score(62.5), 63);
        assert_eq!(round_score(67.5), 68);
        assert_eq!(round_score(67.49), 67);
        assert_eq!(round_score(-3.0), 0);
        assert_eq!(round_score(140.0), 100);
        assert_eq!(round_score(f64::NAN), 0);
    }

    #[test]
    fn seniority_penalty_curve_floors_at_zero() {
        let engine = engine();
        assert_eq!(engine.seniority_score(Some(4)).0, 0.0);
        assert_eq!(engine.seniority_score(Some(3)).0, 10.0);
        assert_eq!(engine.seniority_score(Some(-4)).0, 40.0);
        assert_eq!(
            engine.seniority_score(None),
            (100.0, SeniorityMatch::Unknown)
        );
    }

    #[test]
    fn no_requirements_is_a_perfect_fit() {
        let role = Role {
            id: "open".into(),
            title: "Anything".into(),
            ..Role::default()
        };
        let metrics = engine().score(&role, Some(&base_person()), &[], &[]);
        assert_eq!(metrics.role_fit_score, 100);
    }

    #[test]
    fn vacant_positions_get_neutral_zero_metrics() {
        let metrics = engine().score(&base_role(), None, &["Trust".into()], &[]);
        assert_eq!(metrics, Metrics::vacant());

        let mut placeholder = base_person();
        placeholder.is_hiring = true;
        let metrics = engine().score(&base_role(), Some(&placeholder), &[], &[]);
        assert_eq!(metrics, Metrics::vacant());
    }

    #[test]
    fn manager_fit_averages_only_coded_managers() {
        let managers = vec![
            manager("m1", Some("INTJ")),
            manager("m2", Some("ENTP")),
            manager("m3", None),
        ];

        let detailed = engine().detailed_score(&base_role(), Some(&base_person()), &[], &managers);

        assert_eq!(detailed.metrics.manager_fit_score, Some(75));
        assert_eq!(detailed.manager_fits.len(), 3);
        assert_eq!(detailed.manager_fits[0].score, Some(100));
        assert_eq!(detailed.manager_fits[1].score, Some(50));
        assert_eq!(detailed.manager_fits[2].score, None);
        assert_eq!(detailed.manager_fits[2].manager_name, "Boss m3");
    }

    #[test]
    fn manager_fit_is_none_without_codes() {
        let engine = engine();
        let mut person = base_person();

        let none_coded = vec![manager("m1", None)];
        assert_eq!(
            engine
                .score(&base_role(), Some(&person), &[], &none_coded)
                .manager_fit_score,
            None
        );
        assert_eq!(
            engine
                .score(&base_role(), Some(&person), &[], &[])
                .manager_fit_score,
            None
        );

        person.profile_code = None;
        let coded = vec![manager("m1", Some("INTJ"))];
        let detailed = engine.detailed_score(&base_role(), Some(&person), &[], &coded);
        assert_eq!(detailed.metrics.manager_fit_score, None);
        assert_eq!(detailed.manager_fits[0].score, None);
    }

    #[test]
    fn culture_fit_counts_person_values() {
        let mut person = base_person();
        person.primary_values = vec!["Integrity".into(), "customer focus".into(), "Speed".into()];
        let company = vec!["integrity first".into(), "Customer".into()];

        let detailed = engine().detailed_score(&base_role(), Some(&person), &company, &[]);
        assert_eq!(detailed.metrics.culture_fit_score, 67);
        assert_eq!(
            detailed.matched_culture_values,
            vec!["Integrity".to_string(), "customer focus".to_string()]
        );
    }

    #[test]
    fn culture_fit_is_zero_without_values() {
        let engine = engine();
        let mut person = base_person();
        assert_eq!(
            engine
                .score(&base_role(), Some(&person), &["Trust".into()], &[])
                .culture_fit_score,
            0
        );
        person.primary_values = vec!["Trust".into()];
        assert_eq!(
            engine
                .score(&base_role(), Some(&person), &[], &[])
                .culture_fit_score,
            0
        );
    }

    #[test]
    fn leader_flag_follows_job_title() {
        let engine = engine();
        let mut person = base_person();
        assert!(engine.score(&base_role(), Some(&person), &[], &[]).is_leader);

        person.job_title = "Data Analyst".into();
        assert!(!engine.score(&base_role(), Some(&person), &[], &[]).is_leader);
    }

    #[test]
    fn detailed_score_reports_hard_skills_from_records() {
        let mut role = base_role();
        role.required_hard_skills = vec![SkillRequirement::named("SQL"), SkillRequirement::named("Figma")];
        let mut person = base_person();
        person.soft_skills.push("figma".into());
        person.hard_skills = vec![crate::HardSkillRecord {
            name: "PostgreSQL".into(),
            level: None,
        }];

        let detailed = engine().detailed_score(&role, Some(&person), &[], &[]);
        assert_eq!(detailed.matched_hard_skills, vec!["SQL"]);
        assert_eq!(detailed.missing_hard_skills, vec!["Figma"]);
        assert_eq!(detailed.matched_soft_skills, vec!["Leadership"]);
        assert_eq!(detailed.missing_soft_skills, vec!["Communication"]);
    }

    #[test]
    fn config_validation_rejects_bad_weights() {
        let mut config = ScoringConfig::default();
        assert!(config.validate().is_ok());

        config.weights.skills = 0.7;
        assert!(matches!(config.validate(), Err(ConfigError::WeightSum(_))));

        config.weights = FitWeights {
            skills: -0.5,
            seniority: 1.5,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeWeight { .. })
        ));

        let config = ScoringConfig {
            top_n: 0,
            ..ScoringConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyTopN));
    }

    #[test]
    fn config_validation_rejects_non_finite_weights() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = ScoringConfig {
                weights: FitWeights {
                    skills: bad,
                    seniority: 0.5,
                },
                ..ScoringConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::NonFiniteWeight { .. })),
                "skills = {bad}"
            );
        }

        let config = ScoringConfig {
            weights: FitWeights {
                skills: 0.5,
                seniority: f64::NAN,
            },
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteWeight { .. })
        ));
    }

    #[test]
    fn config_validation_rejects_negative_cutoff_and_penalties() {
        let config = ScoringConfig {
            ranking_cutoff: -1,
            ..ScoringConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NegativeCutoff(-1)));

        let config = ScoringConfig {
            ranking_cutoff: 0,
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_ok());

        let config = ScoringConfig {
            penalties: SeniorityPenalties {
                over_per_level: f64::NAN,
                under_per_level: 15.0,
            },
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPenalty { .. })
        ));

        let config = ScoringConfig {
            penalties: SeniorityPenalties {
                over_per_level: 30.0,
                under_per_level: -5.0,
            },
            ..ScoringConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPenalty { .. })
        ));
    }

    #[test]
    fn manager_list_holding_only_the_assignee_is_still_scored() {
        let person = base_person();
        let managers = vec![person.clone()];

        let detailed = engine().detailed_score(&base_role(), Some(&person), &[], &managers);
        assert_eq!(detailed.metrics.manager_fit_score, Some(100));
        assert_eq!(detailed.manager_fits.len(), 1);
        assert_eq!(detailed.manager_fits[0].manager_id, "p1");
        assert_eq!(detailed.manager_fits[0].score, Some(100));
    }

    #[test]
    fn custom_weights_change_role_fit() {
        let config = ScoringConfig {
            weights: FitWeights {
                skills: 1.0,
                seniority: 0.0,
            },
            ..ScoringConfig::default()
        };
        let engine = FitScoringEngine::new(config, Arc::new(LetterOverlapCompatibility));
        let fit = engine.role_fit(&base_role(), &base_person());
        assert_eq!(fit.role_fit_score, 50);
    }
}
