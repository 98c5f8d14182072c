use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::api::{ClientError, Resource};
use crate::core::session::{boundary, BoundaryAction, SessionStore};
use crate::core::shutdown::shutdown_signal;
use crate::core::state::AppState;
use crate::core::time::format_date_caption;
use crate::schemas::classroom::{Classroom, ClassroomCreate, ClassroomJoin, Role};
use crate::schemas::user::{LoginRequest, SignupRequest};
use crate::services::answer_code::AnswerLetter;
use crate::services::classroom_view::{self, quiz_caption, ClassroomView};
use crate::services::forms::FormErrors;
use crate::services::navigation::{Tab, TabState};
use crate::services::quiz_form::{QuizForm, Upload};
use crate::services::quiz_session::{QuizSession, SessionError, SessionPhase};
use crate::services::review::{review, summarize, OptionMark};
use crate::services::scoring::ScoreReport;
use crate::services::Refresh;

const HELP: &str = "\
Commands:
  whoami                     show the signed-in user
  login [email]              sign in
  signup                     create an account
  logout                     sign out
  classrooms                 list your classrooms
  create-classroom <name>    create a classroom you teach
  join <classroom id>        join a classroom as a student
  open <classroom>           open a classroom by id or name
  tab <quiz|profile|home|N>  switch the visible section (N = sidebar index)
  quizzes                    show the quizzes of the open classroom
  take <quiz>                answer a quiz (students)
  review <quiz>              review a quiz with its answer key
  create-quiz                generate a quiz from a document (teachers)
  metrics                    print submission and request counters
  help                       show this text
  quit                       leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Quit,
    WhoAmI,
    Login(Option<String>),
    Signup,
    Logout,
    Classrooms,
    CreateClassroom(String),
    Join(String),
    Open(String),
    Tab(String),
    Quizzes,
    Take(String),
    Review(String),
    CreateQuiz,
    Metrics,
}

/// Splits one input line into a command. Blank lines yield `None`.
pub(crate) fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let required = |usage: &str| -> Result<String, String> {
        if rest.is_empty() {
            Err(format!("Usage: {usage}"))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match name.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "whoami" => Command::WhoAmI,
        "login" => Command::Login((!rest.is_empty()).then(|| rest.to_string())),
        "signup" => Command::Signup,
        "logout" => Command::Logout,
        "classrooms" => Command::Classrooms,
        "create-classroom" => Command::CreateClassroom(required("create-classroom <name>")?),
        "join" => Command::Join(required("join <classroom id>")?),
        "open" => Command::Open(required("open <classroom>")?),
        "tab" => Command::Tab(required("tab <quiz|profile|home|N>")?),
        "quizzes" => Command::Quizzes,
        "take" => Command::Take(required("take <quiz>")?),
        "review" => Command::Review(required("review <quiz>")?),
        "create-quiz" => Command::CreateQuiz,
        "metrics" => Command::Metrics,
        other => return Err(format!("Unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}

/// Accepts a letter (`b`) or a 1-based option number (`2`).
fn parse_choice(raw: &str) -> Result<usize, String> {
    let raw = raw.trim();
    if let Ok(number) = raw.parse::<usize>() {
        return number.checked_sub(1).ok_or_else(|| "Options are numbered from 1".to_string());
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => {
            AnswerLetter::from_char(letter).map(AnswerLetter::index).map_err(|err| err.to_string())
        }
        _ => Err(format!("'{raw}' is not an option, answer with a letter")),
    }
}

fn option_label(index: usize) -> char {
    AnswerLetter::from_index(index).map(AnswerLetter::as_char).unwrap_or('?')
}

fn answer_recap(answers: &[Option<usize>]) -> String {
    answers
        .iter()
        .enumerate()
        .map(|(position, choice)| match choice {
            Some(index) => format!("{}{}", position + 1, option_label(*index)),
            None => format!("{}-", position + 1),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn resolve_tab(raw: &str) -> Result<Tab, String> {
    match raw.trim().parse::<usize>() {
        Ok(index) => Ok(Tab::from_sidebar_index(index)),
        Err(_) => Tab::from_str(raw),
    }
}

fn write_boundary<W: Write>(out: &mut W, error: &ClientError) -> Result<()> {
    match boundary(error) {
        BoundaryAction::PromptLogin => {
            writeln!(out, "You are not signed in. Use 'login <email>' to continue.")?
        }
        BoundaryAction::Denied(message) => writeln!(out, "Access denied: {message}")?,
        BoundaryAction::RetryBanner(message) => {
            writeln!(out, "{message}")?;
            writeln!(out, "Run the command again to retry.")?;
        }
    }
    Ok(())
}

/// The interactive shell. One instance is one mounted page tree: the home page
/// with its tabs, and at most one opened classroom.
pub(crate) struct Shell<R, W> {
    state: AppState,
    session: SessionStore,
    home_tabs: TabState,
    classrooms: Resource<Vec<Classroom>>,
    classroom: Option<ClassroomView>,
    input: Lines<R>,
    out: W,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub(crate) fn new(state: AppState, input: R, out: W) -> Self {
        Self {
            state,
            session: SessionStore::new(),
            home_tabs: TabState::for_home(),
            classrooms: Resource::Loading,
            classroom: None,
            input: input.lines(),
            out,
        }
    }

    pub(crate) async fn run(&mut self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    pub(crate) async fn run_until<S>(&mut self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        writeln!(self.out, "Testit shell connected to {}", self.state.api().base_url().as_str())?;
        let state = self.state.clone();
        match self.session.refresh_user(state.api()).await {
            Ok(Some(user)) => writeln!(self.out, "Signed in as {}", user.display_name())?,
            Ok(None) => writeln!(self.out, "Not signed in. Use 'login' or 'signup'.")?,
            Err(err) => write_boundary(&mut self.out, &err)?,
        }
        writeln!(self.out, "Type 'help' for commands.")?;

        loop {
            self.write_prompt()?;
            let line = tokio::select! {
                line = self.input.next_line() => line?,
                _ = &mut shutdown => break,
            };
            let Some(line) = line else {
                break;
            };

            match parse_command(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.execute(command).await?,
                Err(message) => writeln!(self.out, "{message}")?,
            }
        }

        writeln!(self.out, "Bye")?;
        self.out.flush()?;
        Ok(())
    }

    fn write_prompt(&mut self) -> Result<()> {
        let location = match &self.classroom {
            Some(view) => {
                let name = view
                    .detail()
                    .data()
                    .map(|detail| detail.classroom.name.as_str())
                    .unwrap_or(view.classroom_id());
                format!("{name}/{}", view.tabs().current())
            }
            None => self.home_tabs.current().to_string(),
        };
        write!(self.out, "testit:{location}> ")?;
        self.out.flush()?;
        Ok(())
    }

    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        Ok(self.input.next_line().await?.map(|line| line.trim().to_string()))
    }

    async fn prompt_u32(&mut self, label: &str, current: u32) -> Result<Option<u32>> {
        loop {
            let Some(raw) = self.prompt(&format!("{label} [{current}]")).await? else {
                return Ok(None);
            };
            if raw.is_empty() {
                return Ok(Some(current));
            }
            match raw.parse::<u32>() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.out, "'{raw}' is not a whole number")?,
            }
        }
    }

    async fn confirm(&mut self, label: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{label} [y/N]")).await?;
        Ok(matches!(answer.as_deref(), Some("y" | "Y" | "yes")))
    }

    /// Backend failures go through the session boundary; anything else ends
    /// the shell.
    async fn execute(&mut self, command: Command) -> Result<()> {
        tracing::debug!(?command, "Executing command");
        let result = match command {
            Command::Help => writeln!(self.out, "{HELP}").map_err(Into::into),
            Command::Quit => Ok(()),
            Command::WhoAmI => self.whoami(),
            Command::Login(email) => self.login(email).await,
            Command::Signup => self.signup().await,
            Command::Logout => self.logout().await,
            Command::Classrooms => self.list_classrooms().await,
            Command::CreateClassroom(name) => self.create_classroom(name).await,
            Command::Join(classroom_id) => self.join_classroom(classroom_id).await,
            Command::Open(reference) => self.open(&reference).await,
            Command::Tab(raw) => self.switch_tab(&raw).await,
            Command::Quizzes => self.show_quizzes(),
            Command::Take(reference) => self.take(&reference).await,
            Command::Review(reference) => self.review(&reference).await,
            Command::CreateQuiz => self.create_quiz().await,
            Command::Metrics => self.show_metrics(),
        };

        match result {
            Ok(()) => Ok(()),
            Err(err) => match err.downcast_ref::<ClientError>() {
                Some(client_error) => self.show_boundary(client_error),
                None => Err(err),
            },
        }
    }

    fn show_boundary(&mut self, error: &ClientError) -> Result<()> {
        write_boundary(&mut self.out, error)
    }

    fn show_form_errors(&mut self, errors: &FormErrors) -> Result<()> {
        if let Some(root) = errors.root() {
            writeln!(self.out, "{root}")?;
        }
        for (field, messages) in errors.fields() {
            for message in messages {
                writeln!(self.out, "  {field}: {message}")?;
            }
        }
        Ok(())
    }

    async fn apply_refresh(&mut self, refresh: Refresh) -> Result<()> {
        let state = self.state.clone();
        match &refresh {
            Refresh::User => {
                self.session.refresh_user(state.api()).await?;
            }
            Refresh::Classrooms => {
                self.classrooms = Resource::fetch(state.api().classrooms()).await;
            }
            Refresh::Classroom(_) => {
                if let Some(view) = self.classroom.as_mut() {
                    view.refresh(state.api(), &refresh).await;
                }
            }
        }
        Ok(())
    }

    fn show_metrics(&mut self) -> Result<()> {
        match crate::core::metrics::render() {
            Some(snapshot) => write!(self.out, "{snapshot}")?,
            None => writeln!(self.out, "Metrics are off. Start with PROMETHEUS_ENABLED=1.")?,
        }
        Ok(())
    }

    fn whoami(&mut self) -> Result<()> {
        match self.session.current_user() {
            Some(user) => {
                writeln!(self.out, "{}", user.display_name())?;
                if let Some(email) = &user.email {
                    writeln!(self.out, "  email: {email}")?;
                }
                if let Some(pronouns) = user.pronouns.as_deref().filter(|value| !value.is_empty()) {
                    writeln!(self.out, "  pronouns: {pronouns}")?;
                }
                let image_url = user.image_url.as_deref().filter(|value| !value.is_empty());
                if let Some(image_url) = image_url {
                    writeln!(self.out, "  avatar: {image_url}")?;
                }
                if let Some(created_at) = user.created_at {
                    writeln!(self.out, "  member since: {}", format_date_caption(created_at))?;
                }
            }
            None => writeln!(self.out, "Not signed in.")?,
        }
        Ok(())
    }

    async fn login(&mut self, email: Option<String>) -> Result<()> {
        let email = match email {
            Some(email) => email,
            None => match self.prompt("Email").await? {
                Some(email) => email,
                None => return Ok(()),
            },
        };
        let Some(password) = self.prompt("Password").await? else {
            return Ok(());
        };

        let state = self.state.clone();
        match self.session.login(state.api(), &LoginRequest { email, password }).await {
            Ok(refresh) => {
                self.apply_refresh(refresh).await?;
                self.whoami()
            }
            Err(errors) => self.show_form_errors(&errors),
        }
    }

    async fn signup(&mut self) -> Result<()> {
        let mut values = Vec::with_capacity(6);
        for label in ["Email", "Password", "First name", "Last name", "Pronouns", "Image URL"] {
            match self.prompt(label).await? {
                Some(value) => values.push(value),
                None => return Ok(()),
            }
        }
        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        let request = SignupRequest {
            email: next(),
            password: next(),
            first_name: next(),
            last_name: next(),
            pronouns: next(),
            image_url: next(),
        };

        let state = self.state.clone();
        match self.session.signup(state.api(), &request).await {
            Ok(refresh) => {
                self.apply_refresh(refresh).await?;
                self.whoami()
            }
            Err(errors) => self.show_form_errors(&errors),
        }
    }

    async fn logout(&mut self) -> Result<()> {
        if !self.session.is_signed_in() {
            writeln!(self.out, "Not signed in.")?;
            return Ok(());
        }
        let state = self.state.clone();
        let refresh = self.session.logout(state.api()).await?;
        self.classroom = None;
        self.classrooms = Resource::Loading;
        self.home_tabs = TabState::for_home();
        self.apply_refresh(refresh).await?;
        writeln!(self.out, "Signed out.")?;
        Ok(())
    }

    async fn list_classrooms(&mut self) -> Result<()> {
        self.apply_refresh(Refresh::Classrooms).await?;
        self.render_classrooms()
    }

    fn render_classrooms(&mut self) -> Result<()> {
        match &self.classrooms {
            Resource::Loading => writeln!(self.out, "Loading classrooms...")?,
            Resource::Failed(err) => write_boundary(&mut self.out, err)?,
            Resource::Ready(classrooms) if classrooms.is_empty() => {
                writeln!(self.out, "You are not in any classroom yet.")?
            }
            Resource::Ready(classrooms) => {
                for classroom in classrooms {
                    write!(
                        self.out,
                        "  {}  {} ({}, taught by {})",
                        classroom.id,
                        classroom.name,
                        classroom.role,
                        classroom.teacher.salutation()
                    )?;
                    match classroom.joined_at {
                        Some(joined_at) => {
                            writeln!(self.out, " joined {}", format_date_caption(joined_at))?
                        }
                        None => writeln!(self.out)?,
                    }
                }
            }
        }
        Ok(())
    }

    async fn create_classroom(&mut self, name: String) -> Result<()> {
        let state = self.state.clone();
        match classroom_view::create_classroom(state.api(), &ClassroomCreate { name }).await {
            Ok(refresh) => {
                writeln!(self.out, "Classroom created.")?;
                self.apply_refresh(refresh).await?;
                self.render_classrooms()
            }
            Err(errors) => self.show_form_errors(&errors),
        }
    }

    async fn join_classroom(&mut self, classroom_id: String) -> Result<()> {
        let state = self.state.clone();
        match classroom_view::join_classroom(state.api(), &ClassroomJoin { classroom_id }).await {
            Ok(refresh) => {
                writeln!(self.out, "Joined.")?;
                self.apply_refresh(refresh).await?;
                self.render_classrooms()
            }
            Err(errors) => self.show_form_errors(&errors),
        }
    }

    async fn open(&mut self, reference: &str) -> Result<()> {
        let state = self.state.clone();
        if self.classrooms.is_loading() {
            self.classrooms = Resource::fetch(state.api().classrooms()).await;
        }
        let classroom_id = self
            .classrooms
            .data()
            .and_then(|classrooms| {
                classrooms.iter().find(|classroom| classroom.name.eq_ignore_ascii_case(reference))
            })
            .map(|classroom| classroom.id.clone())
            .unwrap_or_else(|| reference.to_string());

        let mut view = ClassroomView::new(classroom_id, state.settings().quiz().stale_after_hours);
        view.load(state.api()).await;
        if let Some(err) = view.detail().error() {
            return write_boundary(&mut self.out, err);
        }

        self.classroom = Some(view);
        self.render_classroom()
    }

    async fn switch_tab(&mut self, raw: &str) -> Result<()> {
        let tab = match resolve_tab(raw) {
            Ok(tab) => tab,
            Err(message) => {
                writeln!(self.out, "{message}")?;
                return Ok(());
            }
        };

        if self.classroom.is_some() && tab == Tab::Home {
            self.classroom = None;
            self.home_tabs.select(Tab::Home);
            return self.list_classrooms().await;
        }
        if let Some(view) = self.classroom.as_mut() {
            view.tabs_mut().select(tab);
            return self.render_classroom();
        }

        self.home_tabs.select(tab);
        match tab {
            Tab::Home => self.list_classrooms().await,
            Tab::Profile => self.whoami(),
            Tab::Quizzes => {
                writeln!(self.out, "Open a classroom to see its quizzes.")?;
                Ok(())
            }
        }
    }

    fn render_classroom(&mut self) -> Result<()> {
        let Some(view) = self.classroom.as_ref() else {
            writeln!(self.out, "No classroom is open.")?;
            return Ok(());
        };
        match view.tabs().current() {
            Tab::Quizzes => self.show_quizzes(),
            Tab::Profile => self.show_profile(),
            Tab::Home => Ok(()),
        }
    }

    fn show_profile(&mut self) -> Result<()> {
        let Some(detail) = self.classroom.as_ref().and_then(|view| view.detail().data()) else {
            writeln!(self.out, "No classroom is open.")?;
            return Ok(());
        };

        writeln!(self.out, "{} ({})", detail.classroom.name, detail.classroom.id)?;
        writeln!(self.out, "  teacher: {}", detail.classroom.teacher.salutation())?;
        if let Some(created_at) = detail.classroom.created_at {
            writeln!(self.out, "  created: {}", format_date_caption(created_at))?;
        }
        writeln!(self.out, "  your role: {}", detail.your_role)?;
        writeln!(self.out, "  members: {}", detail.members.len())?;
        for member in &detail.members {
            let name = [member.first_name.as_deref(), member.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            let name = if name.is_empty() { member.user_id.as_str() } else { name.as_str() };
            match member.joined_at {
                Some(joined_at) => writeln!(
                    self.out,
                    "    {name} ({}, joined {})",
                    member.role,
                    format_date_caption(joined_at)
                )?,
                None => writeln!(self.out, "    {name} ({})", member.role)?,
            }
        }
        Ok(())
    }

    fn show_quizzes(&mut self) -> Result<()> {
        let Some(view) = self.classroom.as_ref() else {
            writeln!(self.out, "Open a classroom first.")?;
            return Ok(());
        };

        if view.renders_for(Role::Teacher) {
            let quizzes =
                view.detail().data().map(|detail| detail.quizzes.as_slice()).unwrap_or_default();
            writeln!(self.out, "Quizzes ({})", quizzes.len())?;
            for quiz in quizzes {
                writeln!(self.out, "  {}  {} - {}", quiz.id, quiz.name, quiz_caption(quiz))?;
            }
            return Ok(());
        }

        if !view.renders_for(Role::Student) {
            writeln!(self.out, "This classroom is not available to you.")?;
            return Ok(());
        }

        let now = time::OffsetDateTime::now_utc();
        writeln!(self.out, "New quizzes")?;
        let fresh = view.new_quizzes();
        if fresh.is_empty() {
            writeln!(self.out, "  none")?;
        }
        for quiz in fresh {
            writeln!(self.out, "  {}  {} - {}", quiz.id, quiz.name, quiz_caption(quiz))?;
        }
        writeln!(self.out, "Past quizzes")?;
        let past = view.past_quizzes(now);
        if past.is_empty() {
            writeln!(self.out, "  none")?;
        }
        for quiz in past {
            let status = if quiz.is_completed { "completed" } else { "not taken" };
            writeln!(self.out, "  {}  {} - {} ({status})", quiz.id, quiz.name, quiz_caption(quiz))?;
        }
        Ok(())
    }

    /// Looks up a quiz in the open classroom, gated on the viewer's role.
    fn pick_quiz(
        &mut self,
        reference: &str,
        role: Role,
    ) -> Result<Option<(String, String, String)>> {
        let Some(view) = self.classroom.as_ref() else {
            writeln!(self.out, "Open a classroom first.")?;
            return Ok(None);
        };
        if !view.renders_for(role) {
            writeln!(self.out, "Only a {role} of this classroom can do that.")?;
            return Ok(None);
        }
        match view.find_quiz(reference) {
            Some(quiz) => {
                Ok(Some((view.classroom_id().to_string(), quiz.id.clone(), quiz.name.clone())))
            }
            None => {
                writeln!(self.out, "No quiz matches '{reference}'.")?;
                Ok(None)
            }
        }
    }

    async fn take(&mut self, reference: &str) -> Result<()> {
        let Some((classroom_id, quiz_id, quiz_name)) = self.pick_quiz(reference, Role::Student)?
        else {
            return Ok(());
        };

        let state = self.state.clone();
        let mut attempt = QuizSession::new(classroom_id, quiz_id);
        attempt.load(state.api()).await?;
        let total = attempt.questions().len();
        writeln!(self.out, "{quiz_name}: {total} questions")?;
        if total == 0 {
            writeln!(self.out, "This quiz has no questions yet.")?;
            return Ok(());
        }

        for position in 0..total {
            if !self.answer_question(&mut attempt, position).await? {
                writeln!(self.out, "Attempt abandoned, nothing was submitted.")?;
                return Ok(());
            }
        }

        if !attempt.can_submit() {
            writeln!(self.out, "Every question needs an answer before submitting.")?;
            return Ok(());
        }
        writeln!(self.out, "\nYour answers: {}", answer_recap(attempt.answers()))?;

        loop {
            tracing::debug!(quiz_id = attempt.quiz_id(), "Submitting quiz attempt");
            match attempt.submit(state.api()).await {
                Ok(refresh) => {
                    if let SessionPhase::Succeeded(report) = attempt.phase() {
                        writeln!(self.out, "{report}")?;
                    }
                    return self.apply_refresh(refresh).await;
                }
                Err(SessionError::Rejected(message)) => {
                    writeln!(self.out, "{}", attempt.error_message().unwrap_or(&message))?;
                    if !self.confirm("Your answers are kept. Submit again?").await? {
                        writeln!(self.out, "Attempt not submitted.")?;
                        return Ok(());
                    }
                }
                Err(err) => {
                    writeln!(self.out, "{err}")?;
                    return Ok(());
                }
            }
        }
    }

    /// Returns `false` when input ran out before an answer was picked.
    async fn answer_question(
        &mut self,
        attempt: &mut QuizSession,
        position: usize,
    ) -> Result<bool> {
        let question = attempt.questions()[position].clone();
        writeln!(self.out, "\n{}. {}", position + 1, question.question_text)?;
        for (index, option) in question.options.iter().enumerate() {
            writeln!(self.out, "   {}. {option}", option_label(index))?;
        }

        loop {
            let Some(raw) = self.prompt("Answer").await? else {
                return Ok(false);
            };
            let outcome = parse_choice(&raw)
                .and_then(|option| attempt.select(position, option).map_err(|err| err.to_string()));
            match outcome {
                Ok(()) => return Ok(true),
                Err(message) => writeln!(self.out, "{message}")?,
            }
        }
    }

    async fn review(&mut self, reference: &str) -> Result<()> {
        let Some(role) = self.classroom.as_ref().and_then(ClassroomView::role) else {
            writeln!(self.out, "Open a classroom first.")?;
            return Ok(());
        };
        let Some((classroom_id, quiz_id, quiz_name)) = self.pick_quiz(reference, role)? else {
            return Ok(());
        };

        let state = self.state.clone();
        let payload = state.api().quiz(&classroom_id, &quiz_id).await?;
        let attempt = match role {
            Role::Teacher => None,
            Role::Student => payload.past_attempt(),
        };
        if role == Role::Student && attempt.is_none() {
            writeln!(self.out, "You have not submitted '{quiz_name}' yet.")?;
            return Ok(());
        }

        let reviewed = review(payload.questions(), attempt.as_ref());
        writeln!(self.out, "{quiz_name}")?;
        for (position, question) in reviewed.iter().enumerate() {
            writeln!(self.out, "\n{}. {}", position + 1, question.text)?;
            for (index, option) in question.options.iter().enumerate() {
                let marker = match option.mark {
                    OptionMark::Correct => '+',
                    OptionMark::ChosenIncorrect => 'x',
                    OptionMark::Neutral => ' ',
                };
                writeln!(self.out, " {marker} {}. {}", option_label(index), option.text)?;
            }
        }

        if attempt.is_some() {
            let summary = summarize(&reviewed);
            writeln!(self.out, "\n{}", ScoreReport::new(summary.correct, summary.total))?;
        }
        Ok(())
    }

    async fn create_quiz(&mut self) -> Result<()> {
        let Some(classroom_id) = self
            .classroom
            .as_ref()
            .filter(|view| view.renders_for(Role::Teacher))
            .map(|view| view.classroom_id().to_string())
        else {
            writeln!(self.out, "Open a classroom you teach first.")?;
            return Ok(());
        };

        let state = self.state.clone();
        let mut form = QuizForm::new(state.settings().quiz().max_upload_size_mb);
        form.reset();

        let Some(name) = self.prompt("Quiz name").await? else {
            return Ok(());
        };
        form.set_name(name);

        let Some(path) = self.prompt("Source file").await? else {
            return Ok(());
        };
        if !path.is_empty() {
            match Upload::from_path(Path::new(&path)).await {
                Ok(upload) => form.set_file(upload),
                Err(err) => writeln!(self.out, "{err:#}")?,
            }
        }

        let Some(total) = self.prompt_u32("Number of questions", form.num_questions()).await? else {
            return Ok(());
        };
        form.set_num_questions(total);
        let Some(mcq) = self.prompt_u32("Multiple choice questions", form.mcq()).await? else {
            return Ok(());
        };
        form.set_mcq(mcq);
        writeln!(
            self.out,
            "{} questions: {} multiple choice, {} free response",
            form.num_questions(),
            form.mcq(),
            form.frq()
        )?;

        if !form.can_submit() {
            writeln!(self.out, "A quiz needs a name and a source file.")?;
            return Ok(());
        }
        if let Some(upload) = form.file() {
            writeln!(
                self.out,
                "Creating '{}' from {} ({} bytes)",
                form.name(),
                upload.filename,
                upload.size()
            )?;
        }

        match form.submit(state.api(), &classroom_id).await {
            Ok(refresh) => {
                writeln!(self.out, "Quiz generation started.")?;
                self.apply_refresh(refresh).await
            }
            Err(_) => self.show_form_errors(form.errors()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use axum::extract::Path as UrlPath;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[test]
    fn parses_commands_and_arguments() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command("take  Cells quiz "),
            Ok(Some(Command::Take("Cells quiz".into())))
        );
        assert_eq!(parse_command("LOGIN"), Ok(Some(Command::Login(None))));
        assert_eq!(
            parse_command("login ada@testit.dev"),
            Ok(Some(Command::Login(Some("ada@testit.dev".into()))))
        );
        assert_eq!(parse_command("open"), Err("Usage: open <classroom>".to_string()));
        assert_eq!(parse_command("metrics"), Ok(Some(Command::Metrics)));
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn choices_accept_letters_and_numbers() {
        assert_eq!(parse_choice("b"), Ok(1));
        assert_eq!(parse_choice("D"), Ok(3));
        assert_eq!(parse_choice("3"), Ok(2));
        assert!(parse_choice("0").is_err());
        assert!(parse_choice("e").is_err());
        assert!(parse_choice("ab").is_err());
    }

    #[test]
    fn answer_recap_lists_positions_and_letters() {
        assert_eq!(answer_recap(&[Some(1), None, Some(3)]), "1B 2- 3D");
        assert_eq!(answer_recap(&[]), "");
    }

    #[test]
    fn tabs_resolve_by_name_or_sidebar_index() {
        assert_eq!(resolve_tab("0"), Ok(Tab::Quizzes));
        assert_eq!(resolve_tab("1"), Ok(Tab::Profile));
        assert_eq!(resolve_tab("7"), Ok(Tab::Home));
        assert_eq!(resolve_tab("profile"), Ok(Tab::Profile));
        assert!(resolve_tab("grades").is_err());
    }

    fn classroom_router(submitted: Arc<Mutex<Vec<String>>>) -> Router {
        Router::new()
            .route(
                "/user",
                get(|| async {
                    Json(json!({
                        "status": "success",
                        "user": { "id": "u-1", "first_name": "Grace" }
                    }))
                }),
            )
            .route(
                "/classrooms",
                get(|| async {
                    Json(json!({
                        "classrooms": [{
                            "id": "c-1",
                            "name": "Biology",
                            "role": "student",
                            "joined_at": "2025-09-02T10:00:00+00:00",
                            "teacher": { "id": "t-1", "first_name": "Ada", "last_name": "Lovelace" }
                        }]
                    }))
                }),
            )
            .route(
                "/classroom/:id",
                get(|| async {
                    Json(json!({
                        "status": "success",
                        "classroom": {
                            "id": "c-1",
                            "name": "Biology",
                            "created_at": "2025-09-01T08:00:00+00:00",
                            "teacher": { "id": "t-1", "first_name": "Ada", "last_name": "Lovelace" }
                        },
                        "quizzes": [{
                            "id": "q-1",
                            "name": "Cells",
                            "classroom_id": "c-1",
                            "is_completed": false,
                            "created_at": "2025-10-18T09:30:00+00:00"
                        }],
                        "members": [],
                        "your_role": "student"
                    }))
                }),
            )
            .route(
                "/classroom/:id/quiz/:quiz",
                get(|| async {
                    Json(json!([
                        {
                            "question_text": "Powerhouse of the cell?",
                            "options": ["Nucleus", "Mitochondria"]
                        },
                        { "question_text": "Cell wall in animals?", "options": ["Yes", "No"] }
                    ]))
                }),
            )
            .route(
                "/results/:quiz/answers/:code",
                post(move |UrlPath((_, code)): UrlPath<(String, String)>| {
                    let submitted = submitted.clone();
                    async move {
                        submitted.lock().expect("lock").push(code);
                        Json(json!({
                            "status": "success",
                            "score": 1,
                            "answer": ["BA"],
                            "correct_answers": ["B", "B"]
                        }))
                    }
                }),
            )
    }

    async fn run_shell(router: Router, script: &str) -> String {
        let backend = test_support::spawn_backend(router).await;
        let state = AppState::new(backend.settings, backend.client);
        let mut output = Vec::new();
        {
            let mut shell = Shell::new(state, script.as_bytes(), &mut output);
            shell.run_until(std::future::pending()).await.expect("shell run");
        }
        String::from_utf8(output).expect("utf8 output")
    }

    #[tokio::test]
    async fn student_takes_quiz_and_sees_score() {
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let output = run_shell(
            classroom_router(submitted.clone()),
            "open biology\ntake cells\nz\nb\na\nclassrooms\nquit\n",
        )
        .await;

        assert!(output.contains("Signed in as Grace"));
        assert!(output.contains("New quizzes"));
        assert!(output.contains("Cells - Created on Sat Oct 18 2025"));
        assert!(output.contains("   B. Mitochondria"));
        assert!(output.contains("Your answers: 1B 2A"));
        assert!(output.contains("You got a 1 out of 2, which is: 50.0%"));
        assert_eq!(*submitted.lock().expect("lock"), vec!["BA".to_string()]);
        assert!(output
            .contains("c-1  Biology (student, taught by Ada Lovelace) joined Tue Sep 02 2025"));
    }

    #[tokio::test]
    async fn unauthenticated_requests_prompt_for_login() {
        let router = Router::new()
            .route(
                "/user",
                get(|| async {
                    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Not authenticated" })))
                }),
            )
            .route(
                "/classrooms",
                get(|| async {
                    (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Not authenticated" })))
                }),
            );
        let output = run_shell(router, "classrooms\nopen c-1\nlogout\n").await;

        assert!(output.contains("Not signed in."));
        assert!(output.contains("You are not signed in. Use 'login <email>' to continue."));
        assert!(!output.contains("Signed out."));
        assert!(output.ends_with("Bye\n"));
    }

    #[tokio::test]
    async fn teacher_review_marks_only_the_key() {
        let router = Router::new()
            .route("/user", get(|| async { Json(json!({ "user": { "id": "t-1" } })) }))
            .route(
                "/classroom/:id",
                get(|| async {
                    Json(json!({
                        "classroom": {
                            "id": "c-1",
                            "name": "Biology",
                            "teacher": { "id": "t-1", "first_name": "Ada" }
                        },
                        "quizzes": [{
                            "id": "q-1",
                            "name": "Cells",
                            "classroom_id": "c-1",
                            "is_completed": true,
                            "created_at": "2025-10-18T09:30:00+00:00"
                        }],
                        "members": [],
                        "your_role": "teacher"
                    }))
                }),
            )
            .route(
                "/classroom/:id/quiz/:quiz",
                get(|| async {
                    let questions: Value = json!([
                        {
                            "question_text": "Powerhouse?",
                            "options": ["Nucleus", "Mitochondria"],
                            "correct_answer": ["B"]
                        }
                    ]);
                    Json(questions)
                }),
            );
        let output = run_shell(router, "open c-1\nreview q-1\ntake q-1\n").await;

        assert!(output.contains(" + B. Mitochondria"));
        assert!(output.contains("   A. Nucleus"));
        assert!(!output.contains("You got a"));
        assert!(output.contains("Only a student of this classroom can do that."));
    }
}
