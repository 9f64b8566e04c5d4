use crate::agent::RevisionExpert;
use crate::error::{ProjkilmatError, Result};
use std::io::{BufRead, Write};
use tracing::debug;

// Product wording kept as shipped, Java mention included.
pub const BANNER: &str = "=== Agent de Révision Java Professionnel ===";
pub const TOPIC_PROMPT: &str = "Entrez un sujet Java à réviser (ou 'quitter' pour arrêter) : ";
pub const QUIT_COMMAND: &str = "quitter";
pub const EXPLANATION_HEADER: &str = "--- Explication du concept ---";
pub const QCM_HEADER: &str = "--- Génération d'un QCM ---";
pub const WAIT_MESSAGE: &str = "Génération en cours, veuillez patienter...";
pub const GOODBYE: &str = "Au revoir !";
pub const AGENT_FAILURE: &str = "Une erreur est survenue lors de l'interaction avec l'agent.";

#[derive(Debug, Clone, Copy)]
enum Request {
    Explanation,
    Qcm,
}

/// Interactive console front end for a [`RevisionExpert`].
///
/// Reads one topic per line from `input` and writes the explanation and the QCM for it
/// to `output`, until the user types `quitter` or the input ends.
pub struct ConsoleUi<A, R, W> {
    agent: A,
    input: R,
    output: W,
    streaming: bool,
}

impl<A, R, W> ConsoleUi<A, R, W>
where
    A: RevisionExpert,
    R: BufRead,
    W: Write + Send,
{
    pub fn new(agent: A, input: R, output: W) -> Self {
        Self {
            agent,
            input,
            output,
            streaming: false,
        }
    }

    /// Print answers while they are generated instead of all at once.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the read-topic loop until `quitter` or end of input.
    ///
    /// # Errors
    ///
    /// An agent failure ends the session with a [`ProjkilmatError::TechnicalError`]
    /// wrapping the cause; the goodbye line is not printed in that case.
    pub async fn start(&mut self) -> Result<()> {
        writeln!(self.output, "{}", BANNER)?;

        loop {
            write!(self.output, "\n{}", TOPIC_PROMPT)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                debug!("Input closed, leaving the console loop");
                writeln!(self.output)?;
                break;
            }

            let topic = line.trim();
            if topic.eq_ignore_ascii_case(QUIT_COMMAND) {
                break;
            }
            if topic.is_empty() {
                continue;
            }

            let topic = topic.to_string();
            self.process_topic(&topic).await?;
        }

        writeln!(self.output, "{}", GOODBYE)?;
        self.output.flush()?;
        Ok(())
    }

    /// Ask the agent for an explanation of `topic`, then for a QCM about it.
    pub async fn process_topic(&mut self, topic: &str) -> Result<()> {
        self.run_request(Request::Explanation, topic).await?;
        self.run_request(Request::Qcm, topic).await
    }

    async fn run_request(&mut self, request: Request, topic: &str) -> Result<()> {
        let header = match request {
            Request::Explanation => EXPLANATION_HEADER,
            Request::Qcm => QCM_HEADER,
        };
        writeln!(self.output, "\n{}", header)?;
        writeln!(self.output, "{}", WAIT_MESSAGE)?;
        self.output.flush()?;

        let Self {
            agent,
            output,
            streaming,
            ..
        } = self;

        let result = if *streaming {
            let mut sink = |chunk: &str| -> Result<()> {
                output.write_all(chunk.as_bytes())?;
                output.flush()?;
                Ok(())
            };
            let streamed = match request {
                Request::Explanation => agent.explain_streaming(topic, &mut sink).await,
                Request::Qcm => agent.create_qcm_streaming(topic, &mut sink).await,
            };
            // the text is already on screen, only the line end is missing
            streamed.map(|_| String::new())
        } else {
            match request {
                Request::Explanation => agent.explain(topic).await,
                Request::Qcm => agent.create_qcm(topic).await,
            }
        };

        match result {
            Ok(text) => {
                writeln!(self.output, "{}", text)?;
                self.output.flush()?;
                Ok(())
            }
            Err(e) => {
                debug!("{:?} request for '{}' failed: {}", request, topic, e);
                Err(ProjkilmatError::technical(AGENT_FAILURE, e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ChunkSink;
    use async_trait::async_trait;
    use std::error::Error as _;
    use std::io::Cursor;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeExpert {
        topics: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl RevisionExpert for FakeExpert {
        async fn explain(&self, topic: &str) -> Result<String> {
            self.topics.lock().unwrap().push(topic.to_string());
            if self.fail {
                return Err(ProjkilmatError::GatewayError("Ollama API error: 500".to_string()));
            }
            Ok(format!("Explication de {}", topic))
        }

        async fn create_qcm(&self, topic: &str) -> Result<String> {
            Ok(format!("QCM sur {}\nRéponse : A", topic))
        }

        async fn create_qcm_streaming(&self, topic: &str, sink: ChunkSink<'_>) -> Result<String> {
            sink("QCM ")?;
            sink(topic)?;
            Ok(format!("QCM {}", topic))
        }
    }

    fn run(agent: FakeExpert, input: &str, streaming: bool) -> (Result<()>, String) {
        let mut ui = ConsoleUi::new(agent, Cursor::new(input.to_string()), Vec::new())
            .with_streaming(streaming);
        let result = tokio_test::block_on(ui.start());
        let output = String::from_utf8(ui.into_output()).unwrap();
        (result, output)
    }

    #[test]
    fn test_quit_immediately() {
        let (result, output) = run(FakeExpert::default(), "quitter\n", false);

        assert!(result.is_ok());
        assert!(output.starts_with(BANNER));
        assert!(output.contains(TOPIC_PROMPT));
        assert!(output.ends_with("Au revoir !\n"));
        assert!(!output.contains(EXPLANATION_HEADER));
    }

    #[test]
    fn test_product_wording() {
        let (_, output) = run(FakeExpert::default(), "", false);

        assert!(output.starts_with("=== Agent de Révision Java Professionnel ===\n"));
        assert!(output.contains("\nEntrez un sujet Java à réviser (ou 'quitter' pour arrêter) : "));
    }

    #[test]
    fn test_quit_is_case_insensitive() {
        let (result, output) = run(FakeExpert::default(), "  QuItTeR \nles traits\n", false);

        assert!(result.is_ok());
        assert!(!output.contains("les traits"));
        assert!(output.ends_with("Au revoir !\n"));
    }

    #[test]
    fn test_topic_gets_explanation_then_qcm() {
        let (result, output) = run(FakeExpert::default(), "les closures\nquitter\n", false);

        assert!(result.is_ok());
        let explanation = output.find("Explication de les closures").unwrap();
        let qcm = output.find("QCM sur les closures").unwrap();
        let explanation_header = output.find(EXPLANATION_HEADER).unwrap();
        let qcm_header = output.find(QCM_HEADER).unwrap();

        assert!(explanation_header < explanation);
        assert!(explanation < qcm_header);
        assert!(qcm_header < qcm);
        assert_eq!(output.matches(WAIT_MESSAGE).count(), 2);
        assert_eq!(output.matches(TOPIC_PROMPT).count(), 2);
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let agent = FakeExpert::default();
        let mut ui = ConsoleUi::new(agent, Cursor::new("\n   \nRust\nquitter\n"), Vec::new());

        tokio_test::block_on(ui.start()).unwrap();

        assert_eq!(*ui.agent.topics.lock().unwrap(), vec!["Rust".to_string()]);
        let output = String::from_utf8(ui.into_output()).unwrap();
        assert_eq!(output.matches(TOPIC_PROMPT).count(), 4);
    }

    #[test]
    fn test_end_of_input_says_goodbye() {
        let (result, output) = run(FakeExpert::default(), "les génériques\n", false);

        assert!(result.is_ok());
        assert!(output.contains("Explication de les génériques"));
        assert!(output.ends_with("Au revoir !\n"));
    }

    #[test]
    fn test_agent_failure_ends_session() {
        let agent = FakeExpert {
            fail: true,
            ..Default::default()
        };
        let (result, output) = run(agent, "les threads\nles traits\nquitter\n", false);

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), AGENT_FAILURE);
        assert_eq!(err.source().unwrap().to_string(), "LLM gateway error: Ollama API error: 500");
        assert!(!output.contains(QCM_HEADER));
        assert!(!output.contains(GOODBYE));
    }

    #[test]
    fn test_streaming_writes_chunks() {
        let (result, output) = run(FakeExpert::default(), "Rust\nquitter\n", true);

        assert!(result.is_ok());
        // default streaming delivers the explanation in one piece
        assert!(output.contains("Explication de Rust\n"));
        assert!(output.contains("QCM Rust\n"));
        assert!(!output.contains("Réponse : A"));
    }

    #[tokio::test]
    async fn test_process_single_topic() {
        let mut ui = ConsoleUi::new(FakeExpert::default(), Cursor::new(""), Vec::new());

        ui.process_topic("les lifetimes").await.unwrap();

        let output = String::from_utf8(ui.into_output()).unwrap();
        assert!(output.contains("Explication de les lifetimes"));
        assert!(output.contains("QCM sur les lifetimes"));
        assert!(!output.contains(BANNER));
    }
}
