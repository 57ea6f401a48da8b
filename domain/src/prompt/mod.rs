//! Prompt construction for the tutor.

use crate::query::request::Platform;

/// How live information reaches the model for this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveSearch {
    /// No live information is expected
    Off,
    /// The provider retrieves live data itself (online variant)
    Provider,
    /// Live data arrives through tool calls
    Tools,
}

/// Appended to the answer when live data was needed but no source
/// confirmed it.
pub const UNVERIFIED_NOTE: &str = "⚠️ Não consegui verificar informação atualizada na web, por isso esta resposta pode estar desatualizada.";

/// Answer used when the loop ends without usable model text.
pub const DEGRADED_ANSWER: &str = "Desculpa, não consegui confirmar a informação necessária para responder com segurança. Tenta reformular a pergunta ou pergunta novamente mais tarde.";

/// Templates for the tutor conversation
pub struct TutorPromptTemplate;

impl TutorPromptTemplate {
    /// System prompt for one request.
    pub fn system(platform: &Platform, school_context: Option<&str>, live: LiveSearch) -> String {
        let mut prompt = String::from(
            "És um tutor escolar paciente e motivador. Ajudas alunos e professores a perceber \
             a matéria, explicando passo a passo e adaptando a linguagem ao nível do aluno.\n",
        );

        if let Some(context) = school_context.map(str::trim).filter(|c| !c.is_empty()) {
            prompt.push_str("\nCONTEXTO DA ESCOLA:\n");
            prompt.push_str(context);
            prompt.push('\n');
        }

        prompt.push_str("\nINSTRUÇÕES:\n");
        prompt.push_str("- Responde sempre em português de Portugal (pt-PT).\n");
        prompt.push_str("- Sê didático e rigoroso; se não souberes, diz que não sabes.\n");
        prompt.push_str(Self::platform_style(platform));
        prompt.push_str(Self::live_search_hint(live));
        prompt
    }

    fn platform_style(platform: &Platform) -> &'static str {
        match platform {
            Platform::Whatsapp => {
                "- A resposta vai ser lida no WhatsApp: sê breve (no máximo 3 parágrafos curtos), \
                 usa *negrito* com um asterisco e não uses títulos markdown.\n"
            }
            Platform::Discord => {
                "- A resposta vai ser lida no Discord: sê conciso e evita títulos markdown.\n"
            }
            Platform::Web | Platform::Other(_) => {
                "- Podes usar markdown para estruturar a resposta.\n"
            }
        }
    }

    fn live_search_hint(live: LiveSearch) -> &'static str {
        match live {
            LiveSearch::Off => {
                "- Responde com o teu próprio conhecimento; esta pergunta não precisa de pesquisa.\n"
            }
            LiveSearch::Provider => {
                "- Tens acesso a resultados de pesquisa atuais. Para factos atuais (cargos, \
                 resultados, datas) baseia-te neles e não em memória desatualizada.\n"
            }
            LiveSearch::Tools => {
                "- Se a pergunta depender de informação atual (cargos, notícias, resultados, \
                 preços), usa as ferramentas de pesquisa antes de responder e dá prioridade \
                 aos resultados delas. Se uma ferramenta falhar, responde com o que sabes e \
                 avisa que não foi possível confirmar.\n"
            }
        }
    }

    /// Append [`UNVERIFIED_NOTE`] to an answer.
    pub fn with_unverified_note(answer: &str) -> String {
        format!("{}\n\n{}", answer.trim_end(), UNVERIFIED_NOTE)
    }
}
