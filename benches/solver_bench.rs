//! Benchmarks for assembly and solution

use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fea_bvp::prelude::*;

fn create_cantilever_problem() -> anyhow::Result<Problem> {
    let mut problem = Problem::new();
    let a = Node::xz("N1", 0.0, 0.0);
    let b = Node::xz("N2", 10.0, 0.0);
    problem.add_node(a.clone())?;
    problem.add_node(b.clone())?;

    let section = Section::rectangular(0.3, 0.5)?;
    problem.add_element(Frame2d::new("M1", &a, &b, &Material::steel(), &section, &BTreeSet::new())?)?;

    for dof in [Dof::Ux, Dof::Uz, Dof::Phiy] {
        problem.add_dirichlet("N1", dof, 0.0)?;
    }
    problem.add_neumann("N2", Dof::Uz, -10000.0)?;

    Ok(problem)
}

fn create_multi_story_frame(stories: usize, bays: usize) -> anyhow::Result<Problem> {
    let mut problem = Problem::new();
    let steel = Material::steel();
    let column = Section::rectangular(0.4, 0.4)?;
    let beam = Section::rectangular(0.3, 0.6)?;

    let story_height = 3.5;
    let bay_width = 6.0;

    // Create nodes
    for story in 0..=stories {
        for bay in 0..=bays {
            let name = format!("N{}_{}", story, bay);
            let x = bay as f64 * bay_width;
            let z = story as f64 * story_height;
            problem.add_node(Node::xz(&name, x, z))?;
        }
    }

    // Create columns
    for story in 0..stories {
        for bay in 0..=bays {
            let name = format!("Col{}_{}", story, bay);
            let i_node = problem.node(&format!("N{}_{}", story, bay))?.clone();
            let j_node = problem.node(&format!("N{}_{}", story + 1, bay))?.clone();
            let element = Frame2d::new(&name, &i_node, &j_node, &steel, &column, &BTreeSet::new())?;
            problem.add_element(element)?;
        }
    }

    // Create beams, pinned to the columns at both ends
    for story in 1..=stories {
        for bay in 0..bays {
            let name = format!("Beam{}_{}", story, bay);
            let i_node = problem.node(&format!("N{}_{}", story, bay))?.clone();
            let j_node = problem.node(&format!("N{}_{}", story, bay + 1))?.clone();
            let hinges: BTreeSet<Index> =
                [i_node.index(Dof::Phiy), j_node.index(Dof::Phiy)].into_iter().collect();
            let element = Frame2d::new(&name, &i_node, &j_node, &steel, &beam, &hinges)?;
            problem.add_element(element)?;
            problem.add_element_load(&name, ElementLoad::constant(Dof::Uz, -20000.0))?;
        }
    }

    // Clamp the base
    for bay in 0..=bays {
        let name = format!("N0_{}", bay);
        for dof in [Dof::Ux, Dof::Uz, Dof::Phiy] {
            problem.add_dirichlet(&name, dof, 0.0)?;
        }
    }

    // Wind load on the left column line
    for story in 1..=stories {
        problem.add_neumann(&format!("N{}_0", story), Dof::Ux, 5000.0)?;
    }

    Ok(problem)
}

fn benchmark_cantilever(c: &mut Criterion) {
    let problem = create_cantilever_problem().unwrap();
    let options = SolverOptions::default().with_logging(false);

    c.bench_function("cantilever_linear", |b| {
        b.iter(|| {
            let result = problem.solve(&CholeskySolver, options.clone()).unwrap();
            black_box(result.dimension());
        })
    });
}

fn benchmark_small_frame(c: &mut Criterion) {
    let problem = create_multi_story_frame(3, 2).unwrap();
    let options = SolverOptions::default().with_logging(false);

    c.bench_function("frame_3story_2bay_linear", |b| {
        b.iter(|| {
            let result = problem.solve(&CholeskySolver, options.clone()).unwrap();
            black_box(result.dimension());
        })
    });
}

fn benchmark_medium_frame(c: &mut Criterion) {
    let problem = create_multi_story_frame(10, 5).unwrap();
    let layout = EqLayout::from_problem(&problem).unwrap();
    let mut solver = LinearSolver::new(SolverOptions::default().with_logging(false));

    c.bench_function("frame_10story_5bay_reused_workspace", |b| {
        b.iter(|| {
            let solution = solver.solve(&problem, &layout, &CholeskySolver).unwrap();
            black_box(solution);
        })
    });
}

fn benchmark_interpolation(c: &mut Criterion) {
    let problem = create_multi_story_frame(5, 3).unwrap();
    let result = problem
        .solve(&CholeskySolver, SolverOptions::default().with_logging(false))
        .unwrap();

    c.bench_function("frame_5story_3bay_interpolate_all", |b| {
        b.iter(|| black_box(result.interpolate_all(1e-10)))
    });
}

criterion_group!(
    benches,
    benchmark_cantilever,
    benchmark_small_frame,
    benchmark_medium_frame,
    benchmark_interpolation,
);

criterion_main!(benches);
