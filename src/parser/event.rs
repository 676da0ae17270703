//! `event`, `subscribe`, `process`, and `schedule` declarations. See
//! spec.md §3 "Events / processes / schedules".

use super::Parser;
use crate::error::DazzleResult;
use crate::ir::event::{EventModel, Process, Schedule, Step, Subscribe};
use crate::ir::expr::Expr;
use crate::lexer::{Keyword, TokenKind};
use crate::location::Location;
use std::time::Duration;

enum EventModelItem {
    Topic(String),
    Event(String),
}

enum SubscribeItem {
    Topic(String, Location),
    Handler(String),
}

enum ProcessItem {
    Trigger(String),
    Input(Vec<String>),
    Timeout(Duration),
    Step(Step),
}

enum ScheduleItem {
    Cron(String),
    Step(Step),
}

impl Parser {
    pub(crate) fn parse_event_model(&mut self) -> DazzleResult<EventModel> {
        let loc = self.expect_keyword(Keyword::Event)?;
        let (name, _) = self.ident_like()?;
        self.expect_colon()?;

        let mut topic = None;
        let mut event = None;
        for item in self.parse_block(Self::parse_event_model_item)? {
            match item {
                EventModelItem::Topic(v) => topic = Some(v),
                EventModelItem::Event(v) => event = Some(v),
            }
        }

        Ok(EventModel {
            name,
            topic: topic.ok_or_else(|| self.expected("`topic: \"...\"`"))?,
            event: event.ok_or_else(|| self.expected("`event: \"...\"`"))?,
            location: loc,
        })
    }

    fn parse_event_model_item(&mut self) -> DazzleResult<EventModelItem> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Topic) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(EventModelItem::Topic(v))
            }
            TokenKind::Keyword(Keyword::Event) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(EventModelItem::Event(v))
            }
            _ => Err(self.expected("`topic` or `event`")),
        }
    }

    pub(crate) fn parse_subscribe(&mut self) -> DazzleResult<Subscribe> {
        let loc = self.expect_keyword(Keyword::Subscribe)?;
        let (name, _) = self.ident_like()?;
        self.expect_colon()?;

        let mut topic = None;
        let mut topic_location = loc.clone();
        let mut handler = None;
        for item in self.parse_block(Self::parse_subscribe_item)? {
            match item {
                SubscribeItem::Topic(v, l) => {
                    topic = Some(v);
                    topic_location = l;
                }
                SubscribeItem::Handler(v) => handler = Some(v),
            }
        }

        Ok(Subscribe {
            name,
            topic: topic.ok_or_else(|| self.expected("`topic: \"...\"`"))?,
            topic_location,
            handler,
            location: loc,
        })
    }

    fn parse_subscribe_item(&mut self) -> DazzleResult<SubscribeItem> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Topic) => {
                let loc = self.loc();
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(SubscribeItem::Topic(v, loc))
            }
            TokenKind::Ident(s) if s == "handler" => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.ident_like()?;
                self.end_of_line()?;
                Ok(SubscribeItem::Handler(v))
            }
            _ => Err(self.expected("`topic` or `handler`")),
        }
    }

    pub(crate) fn parse_process(&mut self) -> DazzleResult<Process> {
        let loc = self.expect_keyword(Keyword::Process)?;
        let (name, _) = self.ident_like()?;
        self.expect_colon()?;

        let mut trigger = None;
        let mut input = Vec::new();
        let mut timeout = None;
        let mut steps = Vec::new();

        for item in self.parse_block(Self::parse_process_item)? {
            match item {
                ProcessItem::Trigger(v) => trigger = Some(v),
                ProcessItem::Input(v) => input = v,
                ProcessItem::Timeout(d) => timeout = Some(d),
                ProcessItem::Step(s) => steps.push(s),
            }
        }

        Ok(Process {
            name,
            trigger: trigger.ok_or_else(|| self.expected("`trigger: \"...\"`"))?,
            input,
            steps,
            timeout,
            location: loc,
        })
    }

    fn parse_process_item(&mut self) -> DazzleResult<ProcessItem> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Trigger) => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(ProcessItem::Trigger(v))
            }
            TokenKind::Keyword(Keyword::Input) => {
                self.advance();
                self.expect_colon()?;
                let items = self.bracketed_ident_list()?;
                self.end_of_line()?;
                Ok(ProcessItem::Input(items))
            }
            TokenKind::Keyword(Keyword::Timeout) => {
                self.advance();
                self.expect_colon()?;
                let (n, _) = self.int_lit()?;
                self.end_of_line()?;
                Ok(ProcessItem::Timeout(Duration::from_secs(n.max(0) as u64)))
            }
            TokenKind::Keyword(Keyword::Step) => Ok(ProcessItem::Step(self.parse_step()?)),
            _ => Err(self.expected("`trigger`, `input`, `timeout`, or `step`")),
        }
    }

    pub(crate) fn parse_schedule(&mut self) -> DazzleResult<Schedule> {
        let loc = self.expect_keyword(Keyword::Schedule)?;
        let (name, _) = self.ident_like()?;
        self.expect_colon()?;

        let mut cron = None;
        let mut steps = Vec::new();
        for item in self.parse_block(Self::parse_schedule_item)? {
            match item {
                ScheduleItem::Cron(v) => cron = Some(v),
                ScheduleItem::Step(s) => steps.push(s),
            }
        }

        Ok(Schedule {
            name,
            cron: cron.ok_or_else(|| self.expected("`cron: \"...\"`"))?,
            steps,
            location: loc,
        })
    }

    fn parse_schedule_item(&mut self) -> DazzleResult<ScheduleItem> {
        match self.peek().clone() {
            TokenKind::Ident(s) if s == "cron" => {
                self.advance();
                self.expect_colon()?;
                let (v, _) = self.string_lit()?;
                self.end_of_line()?;
                Ok(ScheduleItem::Cron(v))
            }
            TokenKind::Keyword(Keyword::Step) => Ok(ScheduleItem::Step(self.parse_step()?)),
            _ => Err(self.expected("`cron` or `step`")),
        }
    }

    fn parse_step(&mut self) -> DazzleResult<Step> {
        let loc = self.expect_keyword(Keyword::Step)?;
        let (name, _) = self.ident_like()?;
        self.expect_colon()?;
        let (kind, kind_loc) = self.ident_like()?;

        let step = match kind.as_str() {
            "service_call" => {
                let (service, service_location) = self.parse_kwarg_string_loc("service")?;
                let args = self.parse_kwarg_expr_list("args")?;
                Step::ServiceCall {
                    name,
                    service,
                    service_location,
                    args,
                    location: loc,
                }
            }
            "channel_message" => {
                let (channel, channel_location) = self.parse_kwarg_string_loc("channel")?;
                let payload = self.parse_kwarg_expr("payload")?;
                Step::ChannelMessage {
                    name,
                    channel,
                    channel_location,
                    payload,
                    location: loc,
                }
            }
            "wait" => {
                let secs = self.parse_kwarg_int("duration")?;
                Step::Wait {
                    name,
                    duration: Duration::from_secs(secs.max(0) as u64),
                    location: loc,
                }
            }
            "human_task" => {
                let (role, role_location) = self.parse_kwarg_ident("role")?;
                Step::HumanTask {
                    name,
                    role,
                    role_location,
                    location: loc,
                }
            }
            "signal" => {
                let (signal, signal_location) = self.parse_kwarg_ident("signal")?;
                Step::Signal {
                    name,
                    signal,
                    signal_location,
                    location: loc,
                }
            }
            _ => {
                return Err(self.expected_with_hint_at(
                    "one of service_call, channel_message, wait, human_task, signal",
                    kind_loc,
                ))
            }
        };
        self.end_of_line()?;
        Ok(step)
    }

    fn expect_kwarg_equals(&mut self, key: &str) -> DazzleResult<()> {
        if matches!(self.peek(), TokenKind::Comma) {
            self.advance();
        }
        let (k, _) = self.ident_like()?;
        if k != key {
            return Err(self.expected(format!("`{key}=`")));
        }
        if !matches!(self.peek(), TokenKind::Equals) {
            return Err(self.expected("`=`"));
        }
        self.advance();
        Ok(())
    }

    fn parse_kwarg_string_loc(&mut self, key: &str) -> DazzleResult<(String, Location)> {
        self.expect_kwarg_equals(key)?;
        self.string_lit()
    }

    fn parse_kwarg_ident(&mut self, key: &str) -> DazzleResult<(String, Location)> {
        self.expect_kwarg_equals(key)?;
        self.ident_like()
    }

    fn parse_kwarg_int(&mut self, key: &str) -> DazzleResult<i64> {
        self.expect_kwarg_equals(key)?;
        Ok(self.int_lit()?.0)
    }

    fn parse_kwarg_expr(&mut self, key: &str) -> DazzleResult<Expr> {
        self.expect_kwarg_equals(key)?;
        self.parse_expr()
    }

    fn parse_kwarg_expr_list(&mut self, key: &str) -> DazzleResult<Vec<Expr>> {
        self.expect_kwarg_equals(key)?;
        if !matches!(self.peek(), TokenKind::LBrack) {
            return Err(self.expected("`[`"));
        }
        self.advance();
        let mut args = Vec::new();
        if !matches!(self.peek(), TokenKind::RBrack) {
            loop {
                args.push(self.parse_expr()?);
                if matches!(self.peek(), TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        if !matches!(self.peek(), TokenKind::RBrack) {
            return Err(self.expected("`]`"));
        }
        self.advance();
        Ok(args)
    }
}
