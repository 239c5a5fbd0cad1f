use clap::{Parser, Subcommand};
use intent_responder::{BotConfig, ConversationResponder, ResponsePayload};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Scripted scenarios: (category, messages)
const SCENARIOS: &[(&str, &[&str])] = &[
    ("Karşılama", &["merhaba", "selam", "iyi günler", "günaydın"]),
    ("Ürün Bilgisi", &["hangi ürünler var", "ürün bilgisi istiyorum", "katalog", "fiyat listesi"]),
    ("Sipariş Takibi", &["siparişim nerede", "kargo takibi", "sipariş durumu", "ne zaman gelecek"]),
    ("İade", &["iade etmek istiyorum", "para iadesi", "geri ödeme", "ürünü geri vermek"]),
    ("Teknik Destek", &["teknik destek", "sorun yaşıyorum", "çalışmıyor", "hata alıyorum"]),
    ("Şikayet", &["şikayet", "memnun değilim", "kötü hizmet", "rahatsızım"]),
];

/// Confidence above which a scenario message counts as recognized.
const SUCCESS_CONFIDENCE: f32 = 0.5;

#[derive(Parser)]
#[command(name = "responder")]
#[command(about = "Customer service bot: intent + sentiment driven canned replies")]
struct Cli {
    /// Config file (defaults to BOT_CONFIG or config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session
    Chat,
    /// Run the scripted scenarios and print a summary
    Demo,
    /// Answer one message and print the payload as JSON
    Ask {
        message: String,
    },
    /// Print bot information
    Info,
}

/// Local tally of what the session has seen.
struct SessionStats {
    total_messages: usize,
    intents: HashMap<String, usize>,
    sentiments: HashMap<String, usize>,
    started: Instant,
}

impl SessionStats {
    fn new() -> Self {
        Self {
            total_messages: 0,
            intents: HashMap::new(),
            sentiments: HashMap::new(),
            started: Instant::now(),
        }
    }

    fn record(&mut self, response: &ResponsePayload) {
        self.total_messages += 1;
        *self.intents.entry(response.intent.clone()).or_insert(0) += 1;
        *self
            .sentiments
            .entry(response.sentiment.label.to_string())
            .or_insert(0) += 1;
    }

    fn print(&self) {
        println!("📊 Konuşma İstatistikleri:");
        println!("{}", "-".repeat(30));
        println!("💬 Toplam Mesaj: {}", self.total_messages);

        let elapsed = self.started.elapsed().as_secs();
        println!("⏱️  Konuşma Süresi: {}dk {}sn", elapsed / 60, elapsed % 60);

        print_distribution("🎯 Intent Dağılımı", &self.intents, self.total_messages);
        print_distribution("😊 Sentiment Dağılımı", &self.sentiments, self.total_messages);
    }
}

fn print_distribution(title: &str, counts: &HashMap<String, usize>, total: usize) {
    if counts.is_empty() || total == 0 {
        return;
    }

    let mut entries: Vec<_> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    println!("\n{}:", title);
    for (name, count) in entries {
        let percent = *count as f64 / total as f64 * 100.0;
        println!("   • {}: {} ({:.1}%)", name, count, percent);
    }
}

fn print_response(response: &ResponsePayload, elapsed_secs: f64) {
    println!("\n🤖 Bot: {}", response.text);
    println!("\n📊 Analiz Sonuçları:");
    println!(
        "   🎯 Intent: {} (Güven: {:.2})",
        response.intent, response.intent_confidence
    );
    println!(
        "   😊 Sentiment: {} (Skor: {:.2})",
        response.sentiment.label, response.sentiment.score
    );
    println!("   ⚡ Yanıt Süresi: {:.2}s", elapsed_secs);
    println!("   🕐 Zaman: {}", response.timestamp);
}

fn print_help() {
    println!("📝 Kullanım:");
    println!("  • Mesajınızı yazın ve Enter'a basın");
    println!("  • 'quit' yazarak çıkış yapın");
    println!("  • 'help' yazarak yardım alın");
    println!("  • 'stats' yazarak istatistikleri görün");
    println!("  • 'examples' yazarak örnek mesajları görün");
    println!("  • 'clear' yazarak istatistikleri sıfırlayın");
}

fn print_examples() {
    println!("📚 Örnek Mesajlar:");
    for (category, messages) in SCENARIOS {
        println!("\n🔹 {}:", category);
        for message in *messages {
            println!("   • {}", message);
        }
    }
}

fn print_info(responder: &ConversationResponder) {
    let info = responder.bot_info();
    println!("📋 Bot Adı: {}", info.name);
    println!("🔢 Versiyon: {}", info.version);
    println!("🌍 Dil: {}", info.language);
    println!("🎯 Desteklenen Intent'ler: {}", info.supported_intents.len());
    println!("🧠 Sentiment: {}", info.sentiment_strategy);
}

async fn run_chat(responder: &ConversationResponder) -> Result<(), Box<dyn std::error::Error>> {
    print_info(responder);
    println!();
    print_help();

    let mut stats = SessionStats::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("\n👤 Siz: ");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "help" => print_help(),
            "examples" => print_examples(),
            "stats" => stats.print(),
            "clear" => {
                stats = SessionStats::new();
                println!("🧹 Konuşma geçmişi temizlendi.");
            }
            "" => println!("⚠️  Lütfen bir mesaj yazın."),
            _ => {
                let started = Instant::now();
                let response = responder.respond(input).await;
                stats.record(&response);
                print_response(&response, started.elapsed().as_secs_f64());
            }
        }
    }

    println!("\n👋 Görüşürüz! Demo sona erdi.");
    stats.print();
    Ok(())
}

async fn run_demo(responder: &ConversationResponder) {
    print_info(responder);

    let mut stats = SessionStats::new();
    let mut recognized = 0;

    for (category, messages) in SCENARIOS {
        println!("\n🎭 {} Senaryosu", category);
        println!("{}", "-".repeat(30));

        for message in *messages {
            println!("\n👤 Müşteri: {}", message);
            let started = Instant::now();
            let response = responder.respond(message).await;
            print_response(&response, started.elapsed().as_secs_f64());

            if response.intent_confidence > SUCCESS_CONFIDENCE {
                recognized += 1;
            }
            stats.record(&response);
        }
    }

    println!("\n📊 Demo Tamamlandı!");
    stats.print();

    let total = stats.total_messages.max(1);
    println!(
        "\n✅ Başarılı: {}/{} ({:.1}%)",
        recognized,
        stats.total_messages,
        recognized as f64 / total as f64 * 100.0
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let responder = match cli.config {
        Some(path) => {
            ConversationResponder::from_config(BotConfig::load(path).with_env_overrides()).await
        }
        None => ConversationResponder::from_env().await,
    };

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(&responder).await?,
        Commands::Demo => run_demo(&responder).await,
        Commands::Ask { message } => {
            let response = responder.respond(&message).await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Info => {
            println!("{}", serde_json::to_string_pretty(&responder.bot_info())?);
        }
    }

    Ok(())
}
