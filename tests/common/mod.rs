//! 测试用的内存版后端

#![allow(dead_code)]

use practice_grading::api::{ApiResult, GradingApi};
use practice_grading::models::{
    AnswerDraft, AnswerRecord, AttemptDraft, AudioClip, GradedAnswer, QuestionType, Skill,
    Submission, SubmissionTicket, SubmitAttemptRequest, SubmittedAttempt,
};
use practice_grading::PollPolicy;
use serde_json::Map;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// 某个答案的评分进度
#[derive(Debug, Clone, Copy)]
pub enum Grading {
    /// 第 n 次查询时出分
    ScoreOnPoll(u32, f64),
    /// 永远不出分
    Never,
}

#[derive(Debug, Default)]
pub struct Calls {
    pub submit: u32,
    pub create_speaking: u32,
    pub create_writing: u32,
    pub get_answers: u32,
    /// 按调用顺序记录被查询的评分任务
    pub poll_log: Vec<String>,
    pub poll_times: Vec<(String, Instant)>,
}

impl Calls {
    pub fn polls_for(&self, submission_id: &str) -> usize {
        self.poll_log.iter().filter(|id| *id == submission_id).count()
    }

    /// 同一评分任务相邻两次查询的间隔
    pub fn poll_gaps(&self, submission_id: &str) -> Vec<Duration> {
        let times: Vec<Instant> = self
            .poll_times
            .iter()
            .filter(|(id, _)| id == submission_id)
            .map(|(_, at)| *at)
            .collect();
        times.windows(2).map(|w| w[1] - w[0]).collect()
    }

    pub fn total_creates(&self) -> u32 {
        self.create_speaking + self.create_writing
    }
}

pub struct FakeApi {
    pub submit_fails: bool,
    pub attempt_id: String,
    /// 创建评分任务会失败的答案
    pub failing_creates: Mutex<HashSet<String>>,
    /// 前 n 次查询返回错误
    pub transient_poll_errors: HashMap<String, u32>,
    /// 前 n 次查询返回 success 但没有 data
    pub empty_poll_responses: HashMap<String, u32>,
    pub answers_fail: AtomicBool,
    pub grading: HashMap<String, Grading>,
    pub graded_answers: Vec<GradedAnswer>,
    pub calls: Mutex<Calls>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            submit_fails: false,
            attempt_id: "att-1".to_string(),
            failing_creates: Mutex::new(HashSet::new()),
            transient_poll_errors: HashMap::new(),
            empty_poll_responses: HashMap::new(),
            answers_fail: AtomicBool::new(false),
            grading: HashMap::new(),
            graded_answers: Vec::new(),
            calls: Mutex::new(Calls::default()),
        }
    }

    /// 题目 `question_id` 的评分进度
    pub fn grade(mut self, question_id: &str, grading: Grading) -> Self {
        self.grading.insert(submission_id_for(question_id), grading);
        self
    }

    pub fn fail_create(self, question_id: &str) -> Self {
        self.failing_creates
            .lock()
            .unwrap()
            .insert(answer_id_for(question_id));
        self
    }

    pub fn allow_create(&self, question_id: &str) {
        self.failing_creates
            .lock()
            .unwrap()
            .remove(&answer_id_for(question_id));
    }

    pub fn fail_answers(self) -> Self {
        self.answers_fail.store(true, Ordering::SeqCst);
        self
    }

    pub fn allow_answers(&self) {
        self.answers_fail.store(false, Ordering::SeqCst);
    }

    pub fn calls(&self) -> std::sync::MutexGuard<'_, Calls> {
        self.calls.lock().unwrap()
    }

    fn create(&self, answer_id: &str) -> ApiResult<SubmissionTicket> {
        if self.failing_creates.lock().unwrap().contains(answer_id) {
            return ApiResult::fail("HTTP 503: grading service unavailable");
        }
        ApiResult::ok(SubmissionTicket {
            id: format!("sub-{}", answer_id.trim_start_matches("ans-")),
        })
    }

    fn fetch(&self, submission_id: &str) -> ApiResult<Submission> {
        let poll_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.poll_log.push(submission_id.to_string());
            calls
                .poll_times
                .push((submission_id.to_string(), Instant::now()));
            calls.polls_for(submission_id) as u32
        };

        if let Some(errors) = self.transient_poll_errors.get(submission_id) {
            if poll_number <= *errors {
                return ApiResult::fail("HTTP 502: bad gateway");
            }
        }

        if let Some(empties) = self.empty_poll_responses.get(submission_id) {
            if poll_number <= *empties {
                return ApiResult {
                    success: true,
                    data: None,
                    error: None,
                };
            }
        }

        let ai_score = match self.grading.get(submission_id) {
            Some(Grading::ScoreOnPoll(n, score)) if poll_number >= *n => Some(*score),
            _ => None,
        };

        ApiResult::ok(Submission {
            id: submission_id.to_string(),
            answer_id: Some(format!("ans-{}", submission_id.trim_start_matches("sub-"))),
            ai_score,
            created_at: None,
            extra: Map::new(),
        })
    }
}

impl GradingApi for FakeApi {
    async fn submit_attempt(&self, request: &SubmitAttemptRequest) -> ApiResult<SubmittedAttempt> {
        self.calls.lock().unwrap().submit += 1;
        if self.submit_fails {
            return ApiResult::fail("HTTP 500: internal error");
        }
        ApiResult::ok(SubmittedAttempt {
            id: self.attempt_id.clone(),
            answers: request
                .answers
                .iter()
                .map(|a| AnswerRecord::new(answer_id_for(&a.question_id), &a.question_id))
                .collect(),
        })
    }

    async fn create_speaking_submission(
        &self,
        _attempt_id: &str,
        answer_id: &str,
        _audio: &AudioClip,
    ) -> ApiResult<SubmissionTicket> {
        self.calls.lock().unwrap().create_speaking += 1;
        self.create(answer_id)
    }

    async fn create_writing_submission(
        &self,
        _attempt_id: &str,
        answer_id: &str,
    ) -> ApiResult<SubmissionTicket> {
        self.calls.lock().unwrap().create_writing += 1;
        self.create(answer_id)
    }

    async fn get_speaking_submission(&self, submission_id: &str) -> ApiResult<Submission> {
        self.fetch(submission_id)
    }

    async fn get_writing_submission(&self, submission_id: &str) -> ApiResult<Submission> {
        self.fetch(submission_id)
    }

    async fn get_attempt_answers(&self, _attempt_id: &str) -> ApiResult<Vec<GradedAnswer>> {
        self.calls.lock().unwrap().get_answers += 1;
        if self.answers_fail.load(Ordering::SeqCst) {
            return ApiResult::fail("HTTP 503: service unavailable");
        }
        ApiResult::ok(self.graded_answers.clone())
    }
}

pub fn answer_id_for(question_id: &str) -> String {
    format!("ans-{}", question_id)
}

pub fn submission_id_for(question_id: &str) -> String {
    format!("sub-{}", question_id)
}

/// 测试用轮询参数：次数保持 40，间隔缩短到 1ms
pub fn fast_policy() -> PollPolicy {
    PollPolicy {
        max_attempts: 40,
        base_interval: Duration::from_millis(1),
        step: Duration::ZERO,
        max_interval: Duration::from_millis(1),
    }
}

/// 默认间隔参数：3s 起步，每多一题加 1s，上限 10s
pub fn paced_policy() -> PollPolicy {
    PollPolicy {
        max_attempts: 40,
        base_interval: Duration::from_millis(3000),
        step: Duration::from_millis(1000),
        max_interval: Duration::from_millis(10000),
    }
}

pub fn speaking_answer(question_id: &str, with_audio: bool) -> AnswerDraft {
    AnswerDraft {
        question_id: question_id.to_string(),
        question_content: format!("Speaking prompt {}", question_id),
        question_type: QuestionType::Speaking,
        selected_option_id: None,
        text: None,
        audio_file: None,
        audio: with_audio.then(|| AudioClip::new("rec.webm", "audio/webm", vec![0u8; 16])),
    }
}

pub fn writing_answer(question_id: &str, text: &str) -> AnswerDraft {
    AnswerDraft {
        question_id: question_id.to_string(),
        question_content: format!("Writing prompt {}", question_id),
        question_type: QuestionType::Writing,
        selected_option_id: None,
        text: Some(text.to_string()),
        audio_file: None,
        audio: None,
    }
}

pub fn choice_answer(question_id: &str, option: &str) -> AnswerDraft {
    AnswerDraft {
        question_id: question_id.to_string(),
        question_content: String::new(),
        question_type: QuestionType::SingleChoice,
        selected_option_id: Some(option.to_string()),
        text: None,
        audio_file: None,
        audio: None,
    }
}

pub fn draft(skill: Skill, answers: Vec<AnswerDraft>) -> AttemptDraft {
    AttemptDraft {
        quiz_id: "quiz-1".to_string(),
        title: "Practice test".to_string(),
        skill,
        answers,
        file_path: None,
    }
}
