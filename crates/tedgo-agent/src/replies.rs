//! User-facing text.

pub const BOT_NAME: &str = "TedGo";

pub const HELP_TEXT: &str = "\
TedGo - comandos básicos:
- 'ajuda' ou 'help'           : mostra essa mensagem
- 'blocks' ou 'ver blocos'    : lista blocos (GET /blocks)
- 'mine' ou 'minerar'         : cria e envia uma transação de teste (POST /mine)
- 'tx <from> <to> <amount>'   : cria uma transação e envia para /mine (ex: tx Joao Maria 50)
- '<from> -> <to> <amount>'   : mesma coisa (ex: Joao -> Maria 50)
- 'reenviar pendentes'        : tenta reenviar transações salvas localmente
- 'hist'                      : mostra histórico local das conversas
- 'sair'                      : encerra o TedGo";

pub const TX_USAGE: &str =
    "Não consegui entender a transação. Use: tx <from> <to> <amount> ou <from> -> <to> <amount>";

pub const BLOCKS_FETCHING: &str = "Buscando blocos...";
pub const BLOCKS_EMPTY: &str = "Nenhum bloco encontrado.";
pub const BLOCKS_SHAPE_MISMATCH: &str = "Resposta inesperada do servidor (esperado JSON lista).";

pub const MINE_SENT: &str = "Transação de teste enviada com sucesso.";

pub const HISTORY_EMPTY: &str = "Nenhuma interação registrada ainda.";

pub const NOTHING_PENDING: &str = "Nenhuma transação pendente.";

pub const GOODBYE: &str = "Tchau! Vou encerrar a sessão.";
pub const INTERRUPTED: &str = "Encerrando. Até logo.";
pub const CLOSED: &str = "Encerrado. Até a próxima!";

pub const GREETINGS: &[&str] = &[
    "Olá! Como posso ajudar?",
    "Oi! Quer registrar algo na blockchain?",
    "E aí! Posso ajudar a consultar blocos.",
];
pub const SMALL_TALK: &str =
    "Estou bem, pronto para ajudar com registros e consultas na blockchain.";
pub const NOT_UNDERSTOOD: &str = "Desculpe, não entendi. Use 'ajuda' para ver comandos ou escreva algo como 'tx Joao Maria 50'.";

pub const RESEND_WORDS: &[&str] = &["reenvia", "pendente", "resend", "retry", "pending"];
pub const GREETING_WORDS: &[&str] = &["oi", "olá", "ola", "e ai", "opa"];
pub const SMALL_TALK_WORDS: &[&str] = &["tudo bem", "como vai", "voce vai bem"];

// Session log lines
pub const LOG_STARTED: &str = "TedGo iniciado";
pub const LOG_EXIT_COMMAND: &str = "Sessão encerrada por comando do usuário.";
pub const LOG_INTERRUPTED: &str = "Sessão encerrada (interrupção).";
pub const LOG_FINISHED: &str = "TedGo finalizado";

pub fn welcome() -> String {
    format!("Olá! Eu sou {BOT_NAME}. Digite 'ajuda' para ver os comandos.")
}

pub fn tx_sent(response: &str) -> String {
    format!("Transação enviada com sucesso! Resposta do nó: {response}")
}

pub fn tx_cached(cause: &str) -> String {
    format!("Erro ao enviar transação: {cause}. Salvei localmente e vou tentar depois.")
}

pub fn mine_cached(cause: &str) -> String {
    format!("Erro ao enviar ({cause}). Transação salva para reenvio posterior.")
}

/// Submission failed and the local cache could not be written either.
pub fn not_cached(cause: &str, store_error: &str) -> String {
    format!(
        "Erro ao enviar transação: {cause}. Também não consegui salvá-la localmente: {store_error}"
    )
}

pub fn blocks_error(cause: &str) -> String {
    format!("Erro ao buscar blocos: {cause}")
}

pub fn resend_summary(succeeded: usize, failed: usize) -> String {
    format!("Reenvio concluído. Sucesso: {succeeded}. Falhas: {failed}.")
}
