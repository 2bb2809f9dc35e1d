pub mod microsoft_graph;
