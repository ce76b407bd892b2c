pub mod core;
pub mod analysis;
pub mod index;
pub mod query;
pub mod search;
pub mod parallel;

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                          MEMDEX STRUCT ARCHITECTURE                           │
└──────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────────── CORE ─────────────────────────────────────┐
│                                                                               │
│  ┌─────────────────────────────────────────────────────────────────────┐    │
│  │                        struct SearchEngine                           │    │
│  │  ┌───────────────────────────────────────────────────────────────┐ │    │
│  │  │ config: EngineConfig         // score-map shard layout        │ │    │
│  │  │ stop_words: StopWordSet      // fixed at construction         │ │    │
│  │  │ store: IndexStore            // forward + inverted indices    │ │    │
│  │  │ ranker: Ranker               // tf-idf scoring, seq/parallel  │ │    │
│  │  │ matcher: MatchEngine         // per-document term matching    │ │    │
│  │  └───────────────────────────────────────────────────────────────┘ │    │
│  └─────────────────────────────────────────────────────────────────────┘    │
│                                                                               │
│  ┌──────────────────┐  ┌─────────────────────┐  ┌────────────────────────┐  │
│  │ struct DocId     │  │ enum DocumentStatus │  │ struct Document        │  │
│  │ • 0: i64         │  │ • Actual            │  │ • id: DocId            │  │
│  └──────────────────┘  │ • Irrelevant        │  │ • relevance: f64       │  │
│                        │ • Banned            │  │ • rating: i32          │  │
│  ┌──────────────────┐  │ • Removed           │  └────────────────────────┘  │
│  │ struct Error     │  └─────────────────────┘                              │
│  │ • kind, context  │  ┌─────────────────────┐  ┌────────────────────────┐  │
│  └──────────────────┘  │ struct RequestMeter │  │ struct EngineStats     │  │
│                        │ • window of 1,440   │  │ • documents, terms     │  │
│                        │ • zero_result_count │  └────────────────────────┘  │
│                        └─────────────────────┘                              │
└───────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────── INDEX + ANALYSIS ──────────────────────────────┐
│                                                                               │
│  ┌─────────────────────────────────────────────────────────────────────┐    │
│  │                          struct IndexStore                           │    │
│  │  ┌───────────────────────────────────────────────────────────────┐ │    │
│  │  │ terms: HashSet<Arc<str>>          // append-only intern pool  │ │    │
│  │  │ inverted: term → {doc → tf}       // postings ordered by id   │ │    │
│  │  │ forward: doc → {term → tf}        // ordered by term          │ │    │
│  │  │ documents: doc → DocumentData     // rating + status          │ │    │
│  │  │ document_ids: Vec<DocId>          // insertion order          │ │    │
│  │  └───────────────────────────────────────────────────────────────┘ │    │
│  └─────────────────────────────────────────────────────────────────────┘    │
│                                                                               │
│  ┌─────────────────────┐  ┌──────────────────────────────────────────────┐  │
│  │ struct StopWordSet  │  │ tokenizer: split on 0x20, tokens are views   │  │
│  │ • exact membership  │  │ into the input; control bytes are invalid    │  │
│  └─────────────────────┘  └──────────────────────────────────────────────┘  │
└───────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── QUERY + SEARCH ───────────────────────────────┐
│                                                                               │
│  ┌─────────────────────┐  ┌─────────────────────┐  ┌─────────────────────┐  │
│  │ struct QueryParser  │  │ struct Ranker       │  │ struct MatchEngine  │  │
│  │ • plus/minus terms  │  │ • tf·idf Σ + filter │  │ • plus-terms hit    │  │
│  │ • stop-word filter  │  │ • ε/rating/id sort  │  │ • minus short-circ. │  │
│  └─────────────────────┘  │ • top-5 truncation  │  └─────────────────────┘  │
│                           └─────────────────────┘                            │
└───────────────────────────────────────────────────────────────────────────────┘

┌───────────────────────────────── PARALLEL ───────────────────────────────────┐
│                                                                               │
│  ┌────────────────────────────┐  ┌────────────────────────────────────────┐ │
│  │ struct ShardedScoreMap     │  │ bulk: process_queries[_joined]         │ │
│  │ • mutex + map per shard    │  │ • rayon fan-out, input order kept      │ │
│  │ • ScoreSlot lock guard     │  │ • earliest error wins                  │ │
│  │ • into_ordered_map merge   │  └────────────────────────────────────────┘ │
│  └────────────────────────────┘                                              │
└───────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── RELATIONSHIPS ────────────────────────────────┐
│                                                                               │
│  SearchEngine ──owns──> IndexStore ──interns──> Arc<str> term pool           │
│       │                                                                       │
│       ├──parses with──> QueryParser ──emits──> Query { plus, minus }         │
│       │                                                                       │
│       ├──ranks with──> Ranker ──accumulates──> ShardedScoreMap (parallel)    │
│       │                                                                       │
│       └──matches with──> MatchEngine ──reads──> forward index                │
│                                                                               │
│  process_queries ──fans out──> SearchEngine::find_top_documents              │
│  RequestMeter ──records──> find_top result sizes (sliding 1,440 window)      │
│                                                                               │
└───────────────────────────────────────────────────────────────────────────────┘
*/
