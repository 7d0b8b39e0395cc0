use crate::cache::CacheKind;
use crate::models::CliApp;

impl CliApp {
    pub async fn show_cache_stats(&self) {
        println!("\n📊 Cache Statistics");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!(
            "🌐 Cached pages: {}",
            self.cache.count(CacheKind::Pages).await
        );
        println!(
            "🤖 Cached robots policies: {}",
            self.cache.count(CacheKind::Robots).await
        );
        println!(
            "📇 Cached contact sets: {}",
            self.cache.count(CacheKind::ContactSets).await
        );
    }
}
